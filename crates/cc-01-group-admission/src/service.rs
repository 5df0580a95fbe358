//! # Group Admission Service
//!
//! Application service implementing [`GroupAdmissionApi`].
//!
//! ## Architecture
//!
//! - Implements the inbound port (`GroupAdmissionApi`)
//! - Reads the local store through `EventStoreReader`
//! - Falls back to [`RemoteLookup`] over a `RelayConnector`
//! - Delegates parsing and ownership rules to the domain layer

use async_trait::async_trait;
use shared_types::{Event, Kind};
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::config::{AdmissionConfig, MissingReferencePolicy};
use crate::domain::ownership::{creation_filter, extract_reference};
use crate::domain::schema::{parse_metadata, validate_content};
use crate::domain::{CreationProof, CreationTarget, ResolutionError, Verdict};
use crate::lookup::RemoteLookup;
use crate::ports::inbound::GroupAdmissionApi;
use crate::ports::outbound::{EventStoreReader, RelayConnector};

/// Channel admission service.
///
/// Holds no mutable state: every validation resolves ownership afresh.
pub struct GroupAdmissionService<S: EventStoreReader, C: RelayConnector> {
    config: AdmissionConfig,
    store: S,
    lookup: RemoteLookup<C>,
}

impl<S: EventStoreReader, C: RelayConnector> GroupAdmissionService<S, C> {
    /// Create a service over a store handle and a relay connector.
    pub fn new(config: AdmissionConfig, store: S, connector: C) -> Self {
        let lookup = RemoteLookup::new(
            connector,
            config.fallback_relays.clone(),
            config.connect_timeout(),
        );
        Self {
            config,
            store,
            lookup,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    fn lookup_deadline(&self, caller: Instant) -> Instant {
        caller.min(Instant::now() + self.config.lookup_timeout())
    }

    async fn validate_update(&self, update: &Event, deadline: Instant) -> Result<(), ResolutionError> {
        let proof = self.resolve_creation(update, deadline).await?;
        debug!(
            "[cc-01] Update {} owns its channel ({:?})",
            update.short_id(),
            proof.source
        );
        parse_metadata(&update.content)?;
        Ok(())
    }
}

#[async_trait]
impl<S: EventStoreReader, C: RelayConnector> GroupAdmissionApi for GroupAdmissionService<S, C> {
    fn check_creation(&self, event: &Event) -> Verdict {
        if event.kind != Kind::CHANNEL_CREATION {
            return Verdict::accept();
        }
        let verdict = validate_content(event.kind, &event.content);
        if !verdict.is_accepted() {
            warn!("[cc-01] Rejected creation {}: {}", event.short_id(), verdict.message);
        }
        verdict
    }

    async fn check_update(&self, event: &Event) -> Verdict {
        let deadline = Instant::now() + self.config.lookup_timeout();
        self.check_update_until(event, deadline).await
    }

    async fn check_update_until(&self, event: &Event, deadline: Instant) -> Verdict {
        if event.kind != Kind::CHANNEL_METADATA {
            return Verdict::accept();
        }
        let verdict = Verdict::from(self.validate_update(event, deadline).await);
        if !verdict.is_accepted() {
            warn!("[cc-01] Rejected update {}: {}", event.short_id(), verdict.message);
        }
        verdict
    }

    async fn resolve_creation(
        &self,
        update: &Event,
        deadline: Instant,
    ) -> Result<CreationProof, ResolutionError> {
        let reference = match extract_reference(update) {
            Some(reference) => reference,
            None => match self.config.missing_reference {
                MissingReferencePolicy::Reject => return Err(ResolutionError::MissingReference),
                MissingReferencePolicy::FallThrough => {
                    debug!("[cc-01] Update {} has no channel reference", update.short_id());
                    Default::default()
                }
            },
        };

        let target = CreationTarget::new(update.pubkey.clone(), reference.referenced_event_id);
        let count = self
            .store
            .count_events(&creation_filter(&target))
            .map_err(|e| {
                error!("[cc-01] Event store failed during ownership check: {}", e);
                ResolutionError::storage(e)
            })?;
        if count > 0 {
            return Ok(CreationProof::local());
        }

        let (event, source) = self
            .lookup
            .fetch_creation_event(&target, &reference.relay_hint, self.lookup_deadline(deadline))
            .await?;
        Ok(CreationProof::remote(source, event))
    }

    async fn admit(&self, event: &Event) -> Verdict {
        match event.kind {
            Kind::CHANNEL_CREATION => self.check_creation(event),
            Kind::CHANNEL_METADATA => self.check_update(event).await,
            _ => Verdict::accept(),
        }
    }
}
