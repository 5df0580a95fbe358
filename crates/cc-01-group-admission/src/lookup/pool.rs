//! Pool mode: race every fallback relay for the creation event.
//!
//! All relays are queried concurrently with the same filter and share one
//! deadline. The first owned match wins and the remaining branches are
//! dropped, which releases their connections. Relay failures are only
//! logged: an exhausted pool is reported as "not found".

use futures::stream::{FuturesUnordered, StreamExt};
use shared_types::{Event, Kind};
use tokio::time::Instant;
use tracing::{debug, warn};

use super::RemoteLookup;
use crate::domain::ownership::{creation_filter, select_owned, Candidate};
use crate::domain::{CreationTarget, LookupError};
use crate::ports::outbound::RelayConnector;

impl<C: RelayConnector> RemoteLookup<C> {
    /// Query the fallback pool and return the first owned creation event.
    pub async fn query_pool(
        &self,
        target: &CreationTarget,
        deadline: Instant,
    ) -> Result<Event, LookupError> {
        if self.fallback_relays.is_empty() {
            debug!("[cc-01] No fallback relays configured");
            return Err(LookupError::not_found());
        }

        let filter = creation_filter(target);
        let filter = &filter;
        let mut branches = FuturesUnordered::new();
        for url in &self.fallback_relays {
            branches.push(async move { (url.as_str(), self.query_relay(url, filter, deadline).await) });
        }

        let mut foreign_owner = false;
        while let Some((url, answer)) = branches.next().await {
            match answer {
                Ok(events) => match select_owned(events, target) {
                    Ok(event) => {
                        debug!("[cc-01] Creation event {} found on {}", target.event_id, url);
                        return Ok(event);
                    }
                    Err(Candidate::ForeignOwner) => {
                        warn!(
                            "[cc-01] {} returned {} under another author",
                            url, target.event_id
                        );
                        foreign_owner = true;
                    }
                    Err(_) => debug!("[cc-01] {} has no creation event {}", url, target.event_id),
                },
                Err(e) => debug!("[cc-01] Pool relay {} failed: {}", url, e),
            }
        }

        if foreign_owner {
            Err(LookupError::Unauthorized {
                kind: Kind::CHANNEL_CREATION,
            })
        } else {
            Err(LookupError::not_found())
        }
    }
}
