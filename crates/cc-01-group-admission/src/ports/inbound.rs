//! # Inbound Ports (Driving Ports / API)
//!
//! What the protocol engine calls before persisting an event.

use async_trait::async_trait;
use shared_types::Event;
use tokio::time::Instant;

use crate::domain::{CreationProof, ResolutionError, Verdict};

/// Channel admission API.
///
/// Implementations must be thread-safe (`Send + Sync`) and keep no state
/// between calls.
#[async_trait]
pub trait GroupAdmissionApi: Send + Sync {
    /// Validate a channel creation event (kind 40). Other kinds pass.
    fn check_creation(&self, event: &Event) -> Verdict;

    /// Validate a channel metadata update (kind 41): ownership first, then
    /// content. Other kinds pass.
    async fn check_update(&self, event: &Event) -> Verdict;

    /// Same as `check_update`, bounded by the earlier of `deadline` and the
    /// configured lookup timeout.
    async fn check_update_until(&self, event: &Event, deadline: Instant) -> Verdict;

    /// Prove that the creation event referenced by `update` exists under the
    /// update's author, locally or on a remote relay.
    async fn resolve_creation(
        &self,
        update: &Event,
        deadline: Instant,
    ) -> Result<CreationProof, ResolutionError>;

    /// Full admission decision: creation events get content validation,
    /// update events get ownership resolution, everything else passes.
    async fn admit(&self, event: &Event) -> Verdict;
}

/// One rejection rule registered with the protocol engine.
///
/// Rules are evaluated in registration order and every rule runs; any
/// reject blocks the event.
#[async_trait]
pub trait RejectPolicy: Send + Sync {
    /// Name for logs.
    fn name(&self) -> &'static str;

    /// Decide whether `event` must be refused.
    async fn check(&self, event: &Event) -> Verdict;
}
