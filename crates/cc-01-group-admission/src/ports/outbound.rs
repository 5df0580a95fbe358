//! # Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies this subsystem needs: a read-only view of the local event
//! store and a way to query other relays.

use async_trait::async_trait;
use shared_types::{Event, Filter};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Event Store
// =============================================================================

/// Error from the local event store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backend reported a fault.
    #[error("{0}")]
    Backend(String),

    /// The store is not reachable.
    #[error("event store unavailable")]
    Unavailable,
}

/// Read access to locally persisted events.
///
/// Counting is a synchronous read; implementations must not perform
/// network I/O here.
pub trait EventStoreReader: Send + Sync {
    /// Count stored events matching `filter`.
    fn count_events(&self, filter: &Filter) -> Result<usize, StoreError>;
}

impl<T: EventStoreReader + ?Sized> EventStoreReader for Arc<T> {
    fn count_events(&self, filter: &Filter) -> Result<usize, StoreError> {
        (**self).count_events(filter)
    }
}

// =============================================================================
// Relay Network
// =============================================================================

/// Error from the outbound relay client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// The connection could not be established.
    #[error("failed to connect to {url}: {reason}")]
    Connect {
        /// Relay URL.
        url: String,
        /// Transport diagnostic.
        reason: String,
    },

    /// The connection attempt exceeded its timeout.
    #[error("connection to {url} timed out")]
    ConnectTimeout {
        /// Relay URL.
        url: String,
    },

    /// The query failed after connecting.
    #[error("query to {url} failed: {reason}")]
    Query {
        /// Relay URL.
        url: String,
        /// Transport or protocol diagnostic.
        reason: String,
    },

    /// The relay refused the subscription.
    #[error("relay {url} closed the subscription: {reason}")]
    Closed {
        /// Relay URL.
        url: String,
        /// Reason sent by the relay.
        reason: String,
    },
}

/// An open connection to one relay, scoped to one lookup.
///
/// Implementations must release the underlying transport both in `close`
/// and when dropped, because pool lookups drop the branches that lose the
/// race.
#[async_trait]
pub trait RelayConnection: Send {
    /// URL this connection was opened to.
    fn url(&self) -> &str;

    /// Run one filtered query and return every stored event it matches.
    async fn query_sync(&mut self, filter: &Filter) -> Result<Vec<Event>, RelayError>;

    /// Close the connection.
    async fn close(&mut self);
}

/// Factory for relay connections.
#[async_trait]
pub trait RelayConnector: Send + Sync {
    /// Connection type produced by this connector.
    type Connection: RelayConnection;

    /// Connect to `url`, failing if it takes longer than `timeout`.
    async fn connect(&self, url: &str, timeout: Duration) -> Result<Self::Connection, RelayError>;
}

#[async_trait]
impl<T: RelayConnector> RelayConnector for Arc<T> {
    type Connection = T::Connection;

    async fn connect(&self, url: &str, timeout: Duration) -> Result<Self::Connection, RelayError> {
        (**self).connect(url, timeout).await
    }
}
