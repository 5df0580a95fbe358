//! # Relay Runtime
//!
//! Wires the group admission subsystem into a relay.
//!
//! ## Components
//!
//! - `container`: `RelayConfig` loaded from TOML with env overrides
//! - `registry`: the ordered reject-policy chain
//! - `adapters`: in-memory event store implementing the storage port
//! - `runtime`: `RelayRuntime::submit`, policies then store
//! - `cli`: command line front end
//!
//! ## Pipeline
//!
//! ```text
//! event ──► PolicyChain ──► [channel-creation-content] ──► [channel-update-ownership]
//!                │                                                    │
//!                └──────────── any reject ──► Rejection { message } ◄─┘
//!                │
//!                └── accept ──► InMemoryEventStore::save ──► "Event saved"
//! ```

pub mod adapters;
pub mod cli;
pub mod container;
pub mod registry;
pub mod runtime;

pub use adapters::InMemoryEventStore;
pub use container::{ConfigError, RelayConfig};
pub use registry::PolicyChain;
pub use runtime::{Accepted, Rejection, RelayRuntime};
