//! # Relay Runtime
//!
//! The admission pipeline: every submitted event runs through the policy
//! chain, and accepted events are saved to the event store.

use cc_01_group_admission::{
    admission_policies, GroupAdmissionApi, GroupAdmissionService, RelayConnector,
};
use relay_telemetry::log_event;
use shared_types::{Event, EventId};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::adapters::InMemoryEventStore;
use crate::container::RelayConfig;
use crate::registry::PolicyChain;

/// Event refused by the pipeline. The message is sent back to the client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct Rejection {
    /// Id of the refused event.
    pub event_id: EventId,
    /// Reason for the client.
    pub message: String,
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    /// Id of the accepted event.
    pub event_id: EventId,
    /// Whether the store already held it.
    pub duplicate: bool,
}

/// Admission pipeline over an in-memory store.
pub struct RelayRuntime {
    store: Arc<InMemoryEventStore>,
    policies: PolicyChain,
    admission: Arc<dyn GroupAdmissionApi>,
}

impl RelayRuntime {
    /// Build a runtime with an empty store.
    pub fn new<C>(config: &RelayConfig, connector: C) -> Self
    where
        C: RelayConnector + 'static,
    {
        Self::with_store(config, Arc::new(InMemoryEventStore::new()), connector)
    }

    /// Build a runtime over an existing store.
    pub fn with_store<C>(config: &RelayConfig, store: Arc<InMemoryEventStore>, connector: C) -> Self
    where
        C: RelayConnector + 'static,
    {
        let admission: Arc<dyn GroupAdmissionApi> = Arc::new(GroupAdmissionService::new(
            config.admission.clone(),
            Arc::clone(&store),
            connector,
        ));

        let mut policies = PolicyChain::new();
        policies.register_all(admission_policies(Arc::clone(&admission)));

        info!(
            "[runtime] Admission ready: {} policies, {} fallback relays",
            policies.len(),
            config.admission.fallback_relays.len()
        );

        Self {
            store,
            policies,
            admission,
        }
    }

    /// The event store.
    pub fn store(&self) -> &Arc<InMemoryEventStore> {
        &self.store
    }

    /// The registered policy chain.
    pub fn policies(&self) -> &PolicyChain {
        &self.policies
    }

    /// The admission service behind the policies.
    pub fn admission(&self) -> &Arc<dyn GroupAdmissionApi> {
        &self.admission
    }

    /// Run `event` through the policy chain and store it if accepted.
    pub async fn submit(&self, event: Event) -> Result<Accepted, Rejection> {
        let verdict = self.policies.evaluate(&event).await;
        if verdict.reject {
            return Err(Rejection {
                event_id: event.id,
                message: verdict.message,
            });
        }

        let event_id = event.id.clone();
        let kind = event.kind;
        match self.store.save(event) {
            Ok(stored) => {
                log_event!(info, "runtime", "Event saved", id = %event_id, kind = %kind);
                Ok(Accepted {
                    event_id,
                    duplicate: !stored,
                })
            }
            Err(e) => {
                error!("[runtime] Failed to save {}: {}", event_id, e);
                Err(Rejection {
                    event_id,
                    message: format!("error: failed to save event: {e}"),
                })
            }
        }
    }
}
