//! # CC-01 Group Admission
//!
//! Admission control for public chat channels on a relay.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A channel is created by a kind 40 event and edited by kind 41 metadata
//! updates. Before the relay stores either, this crate decides:
//! - Creation events must carry well-formed channel metadata
//! - Updates must reference a creation event signed by the same author,
//!   found in the local store or fetched from another relay
//!
//! ## Ownership Resolution
//!
//! | Step | Source | Failure |
//! |------|--------|---------|
//! | 1 | Local store count `{kind=40, author, id}` | store fault rejects (fail closed) |
//! | 2a | Hinted relay, exactly one result | connect/query error, zero or many results |
//! | 2b | Fallback pool race, first match wins | "40 channel not found" |
//!
//! ## Module Structure
//!
//! ```text
//! cc-01-group-admission/
//! ├── domain/          # Metadata, proofs, verdicts, schema and ownership rules
//! ├── ports/           # API traits (inbound) + store/relay traits (outbound)
//! ├── lookup/          # Hinted and pool remote lookups
//! ├── adapters/        # Mock store/network, WebSocket connector (feature "ws")
//! ├── service.rs       # GroupAdmissionService
//! ├── policies.rs      # Reject policies for the protocol engine
//! └── config.rs        # AdmissionConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod lookup;
pub mod policies;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{MockEventStore, MockRelayNetwork};
#[cfg(feature = "ws")]
pub use adapters::WebSocketConnector;
pub use config::{AdmissionConfig, MissingReferencePolicy, DEFAULT_FALLBACK_RELAYS};
pub use domain::{
    CreationProof, CreationTarget, GroupMetadata, LookupError, ProofSource, ReferenceTag,
    ResolutionError, SchemaError, Verdict,
};
pub use lookup::RemoteLookup;
pub use policies::{admission_policies, CreationContentPolicy, UpdateOwnershipPolicy};
pub use ports::{
    EventStoreReader, GroupAdmissionApi, RejectPolicy, RelayConnection, RelayConnector,
    RelayError, StoreError,
};
pub use service::GroupAdmissionService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
