//! # Remote Lookup Strategy
//!
//! Fetches a channel creation event from other relays when the local store
//! does not have it.
//!
//! - **Hinted mode**: the update names a relay; query only that relay and
//!   require exactly one result.
//! - **Pool mode**: no hint; race the configured fallback relays and take the
//!   first matching event (see [`pool`]).
//!
//! Every relay connection is scoped to one query: opened, queried, and closed
//! before the call returns. Both modes are bounded by the caller's deadline.

pub mod pool;

use shared_types::{Event, Filter, Kind};
use std::time::Duration;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, warn};

use crate::domain::ownership::{creation_filter, select_single};
use crate::domain::{CreationTarget, LookupError, ProofSource};
use crate::ports::outbound::{RelayConnection, RelayConnector};

/// Upper bound on closing a connection, which may run after the deadline.
pub const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Remote creation-event lookup over a relay connector.
pub struct RemoteLookup<C: RelayConnector> {
    connector: C,
    fallback_relays: Vec<String>,
    connect_timeout: Duration,
}

impl<C: RelayConnector> RemoteLookup<C> {
    /// Create a lookup over `connector` with an injected fallback pool.
    pub fn new(connector: C, fallback_relays: Vec<String>, connect_timeout: Duration) -> Self {
        Self {
            connector,
            fallback_relays,
            connect_timeout,
        }
    }

    /// Relays raced in pool mode.
    pub fn fallback_relays(&self) -> &[String] {
        &self.fallback_relays
    }

    /// Fetch the target's creation event, from `relay_hint` if non-empty,
    /// otherwise from the fallback pool.
    pub async fn fetch_creation_event(
        &self,
        target: &CreationTarget,
        relay_hint: &str,
        deadline: Instant,
    ) -> Result<(Event, ProofSource), LookupError> {
        if relay_hint.is_empty() {
            let event = self.query_pool(target, deadline).await?;
            Ok((event, ProofSource::RemotePool))
        } else {
            let event = self.query_hinted(relay_hint, target, deadline).await?;
            Ok((event, ProofSource::RemoteHint))
        }
    }

    /// Query a single relay and require exactly one matching event.
    pub async fn query_hinted(
        &self,
        url: &str,
        target: &CreationTarget,
        deadline: Instant,
    ) -> Result<Event, LookupError> {
        debug!("[cc-01] Querying hinted relay {} for {}", url, target.event_id);
        let filter = creation_filter(target);
        let events = self.query_relay(url, &filter, deadline).await?;
        select_single(events, target)
    }

    /// Connect, run one query, close. The connection is closed on every path
    /// once it has been opened, including when the deadline cuts the query short.
    /// A close that outlasts [`CLOSE_GRACE`] is abandoned and the connection
    /// is dropped.
    async fn query_relay(
        &self,
        url: &str,
        filter: &Filter,
        deadline: Instant,
    ) -> Result<Vec<Event>, LookupError> {
        let connect = self.connector.connect(url, self.connect_timeout);
        let mut connection = match timeout_at(deadline, connect).await {
            Ok(connected) => connected?,
            Err(_) => return Err(deadline_exceeded()),
        };

        let answer = timeout_at(deadline, connection.query_sync(filter)).await;
        if timeout(CLOSE_GRACE, connection.close()).await.is_err() {
            warn!("[cc-01] Closing {} timed out, dropping connection", url);
        }

        match answer {
            Ok(events) => Ok(events?),
            Err(_) => Err(deadline_exceeded()),
        }
    }
}

fn deadline_exceeded() -> LookupError {
    LookupError::DeadlineExceeded {
        kind: Kind::CHANNEL_CREATION,
    }
}
