//! Runtime adapters.

pub mod event_store;

pub use event_store::InMemoryEventStore;
