//! # Adapters Layer
//!
//! Implementations of the outbound ports.
//!
//! - `mock`: in-process store and relay network for tests
//! - `websocket`: relay client over WebSocket (feature `ws`)

pub mod mock;

#[cfg(feature = "ws")]
pub mod websocket;

pub use mock::{MockConnection, MockEventStore, MockRelayNetwork};

#[cfg(feature = "ws")]
pub use websocket::{RelayMessage, WebSocketConnection, WebSocketConnector};
