//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API the protocol engine calls
//! - **Outbound (Driven)**: event store and relay network this subsystem needs

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
