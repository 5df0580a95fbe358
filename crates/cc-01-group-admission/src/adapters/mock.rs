//! # Mock Adapters
//!
//! In-process stand-ins for the event store and the relay network, used by
//! unit tests here and by the integration test crate.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{Event, Filter};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::ports::outbound::{
    EventStoreReader, RelayConnection, RelayConnector, RelayError, StoreError,
};

// =============================================================================
// Event Store
// =============================================================================

/// Fixed set of events with optional failure injection.
#[derive(Default)]
pub struct MockEventStore {
    events: Mutex<Vec<Event>>,
    failure: Mutex<Option<StoreError>>,
    queries: AtomicUsize,
}

impl MockEventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `events`.
    pub fn with_events(events: Vec<Event>) -> Self {
        let store = Self::default();
        *store.events.lock() = events;
        store
    }

    /// Add an event.
    pub fn insert(&self, event: Event) {
        self.events.lock().push(event);
    }

    /// Make every subsequent count fail with `error`.
    pub fn fail_with(&self, error: StoreError) {
        *self.failure.lock() = Some(error);
    }

    /// Number of count queries served.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl EventStoreReader for MockEventStore {
    fn count_events(&self, filter: &Filter) -> Result<usize, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failure.lock().clone() {
            return Err(error);
        }
        Ok(self.events.lock().iter().filter(|e| filter.matches(e)).count())
    }
}

// =============================================================================
// Relay Network
// =============================================================================

#[derive(Clone, Default)]
struct MockRelay {
    events: Vec<Event>,
    reachable: bool,
    query_error: Option<String>,
    latency: Duration,
    ignore_filter: bool,
    close_stalls: bool,
}

#[derive(Default)]
struct NetworkState {
    relays: HashMap<String, MockRelay>,
    connects: usize,
    open: usize,
    closes: usize,
    queried: Vec<String>,
}

/// A simulated set of relays.
///
/// Clones share state, so a test keeps one handle for setup and inspection
/// while the service owns another as its connector.
#[derive(Clone, Default)]
pub struct MockRelayNetwork {
    state: Arc<Mutex<NetworkState>>,
}

impl MockRelayNetwork {
    /// Create an empty network. Unknown URLs refuse connections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reachable relay storing `events`.
    pub fn add_relay(&self, url: &str, events: Vec<Event>) {
        self.state.lock().relays.insert(
            url.to_string(),
            MockRelay {
                events,
                reachable: true,
                ..Default::default()
            },
        );
    }

    /// Register a relay that refuses connections.
    pub fn add_unreachable(&self, url: &str) {
        self.state
            .lock()
            .relays
            .insert(url.to_string(), MockRelay::default());
    }

    /// Delay every query to `url` by `latency`.
    pub fn set_latency(&self, url: &str, latency: Duration) {
        self.with_relay(url, |relay| relay.latency = latency);
    }

    /// Make queries to `url` fail with `reason`.
    pub fn set_query_error(&self, url: &str, reason: &str) {
        let reason = reason.to_string();
        self.with_relay(url, |relay| relay.query_error = Some(reason));
    }

    /// Make `url` return every stored event regardless of the filter.
    pub fn set_ignore_filter(&self, url: &str) {
        self.with_relay(url, |relay| relay.ignore_filter = true);
    }

    /// Make closing a connection to `url` never complete.
    pub fn set_close_stall(&self, url: &str) {
        self.with_relay(url, |relay| relay.close_stalls = true);
    }

    /// Connection attempts made so far.
    pub fn connect_count(&self) -> usize {
        self.state.lock().connects
    }

    /// Connections currently open.
    pub fn open_connections(&self) -> usize {
        self.state.lock().open
    }

    /// Connections closed explicitly.
    pub fn close_count(&self) -> usize {
        self.state.lock().closes
    }

    /// URLs queried, in query order.
    pub fn queried_relays(&self) -> Vec<String> {
        self.state.lock().queried.clone()
    }

    fn with_relay(&self, url: &str, update: impl FnOnce(&mut MockRelay)) {
        if let Some(relay) = self.state.lock().relays.get_mut(url) {
            update(relay);
        }
    }
}

#[async_trait]
impl RelayConnector for MockRelayNetwork {
    type Connection = MockConnection;

    async fn connect(&self, url: &str, _timeout: Duration) -> Result<MockConnection, RelayError> {
        let mut state = self.state.lock();
        state.connects += 1;

        let reachable = state.relays.get(url).map(|r| r.reachable).unwrap_or(false);
        if !reachable {
            return Err(RelayError::Connect {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }

        state.open += 1;
        Ok(MockConnection {
            url: url.to_string(),
            state: Arc::clone(&self.state),
            closed: false,
        })
    }
}

/// Connection handed out by [`MockRelayNetwork`].
pub struct MockConnection {
    url: String,
    state: Arc<Mutex<NetworkState>>,
    closed: bool,
}

impl MockConnection {
    fn release(&mut self) {
        if !self.closed {
            self.closed = true;
            self.state.lock().open -= 1;
        }
    }
}

#[async_trait]
impl RelayConnection for MockConnection {
    fn url(&self) -> &str {
        &self.url
    }

    async fn query_sync(&mut self, filter: &Filter) -> Result<Vec<Event>, RelayError> {
        let relay = {
            let mut state = self.state.lock();
            state.queried.push(self.url.clone());
            state.relays.get(&self.url).cloned().unwrap_or_default()
        };

        if !relay.latency.is_zero() {
            tokio::time::sleep(relay.latency).await;
        }

        if let Some(reason) = relay.query_error {
            return Err(RelayError::Query {
                url: self.url.clone(),
                reason,
            });
        }

        Ok(relay
            .events
            .into_iter()
            .filter(|e| relay.ignore_filter || filter.matches(e))
            .collect())
    }

    async fn close(&mut self) {
        let stalls = {
            let state = self.state.lock();
            state.relays.get(&self.url).is_some_and(|r| r.close_stalls)
        };
        if stalls {
            std::future::pending::<()>().await;
        }
        if !self.closed {
            self.state.lock().closes += 1;
        }
        self.release();
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Kind;

    fn creation(author: &str) -> Event {
        Event::new(author, 1, Kind::CHANNEL_CREATION, vec![], "{}")
    }

    #[test]
    fn test_mock_store_counts_matching_events() {
        let ev = creation("alice");
        let store = MockEventStore::with_events(vec![ev.clone(), creation("bob")]);

        let filter = Filter::new().kind(Kind::CHANNEL_CREATION).author("alice");
        assert_eq!(store.count_events(&filter), Ok(1));
        assert_eq!(store.query_count(), 1);
    }

    #[test]
    fn test_mock_store_failure_injection() {
        let store = MockEventStore::new();
        store.fail_with(StoreError::Unavailable);
        assert_eq!(store.count_events(&Filter::new()), Err(StoreError::Unavailable));
    }

    #[tokio::test]
    async fn test_unknown_relay_refuses() {
        let network = MockRelayNetwork::new();
        let err = network
            .connect("wss://nowhere.example", Duration::from_secs(1))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RelayError::Connect { .. }));
        assert_eq!(network.open_connections(), 0);
    }

    #[tokio::test]
    async fn test_drop_releases_connection() {
        let network = MockRelayNetwork::new();
        network.add_relay("wss://a.example", vec![]);

        let conn = network
            .connect("wss://a.example", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(network.open_connections(), 1);

        drop(conn);
        assert_eq!(network.open_connections(), 0);
        assert_eq!(network.close_count(), 0);
    }

    #[tokio::test]
    async fn test_query_applies_filter() {
        let ev = creation("alice");
        let network = MockRelayNetwork::new();
        network.add_relay("wss://a.example", vec![ev.clone(), creation("bob")]);

        let mut conn = network
            .connect("wss://a.example", Duration::from_secs(1))
            .await
            .unwrap();
        let events = conn
            .query_sync(&Filter::new().author("alice"))
            .await
            .unwrap();
        conn.close().await;

        assert_eq!(events, vec![ev]);
        assert_eq!(network.close_count(), 1);
        assert_eq!(network.queried_relays(), vec!["wss://a.example".to_string()]);
    }
}
