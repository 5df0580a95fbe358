//! Reject policies registered with the protocol engine.
//!
//! The relay registers one policy per concern. Both wrap a shared
//! [`GroupAdmissionApi`] so they run against the same configuration.

use async_trait::async_trait;
use shared_types::Event;
use std::sync::Arc;

use crate::domain::Verdict;
use crate::ports::inbound::{GroupAdmissionApi, RejectPolicy};

/// Rejects channel creation events whose content is not channel metadata.
pub struct CreationContentPolicy {
    admission: Arc<dyn GroupAdmissionApi>,
}

impl CreationContentPolicy {
    /// Wrap an admission service.
    pub fn new(admission: Arc<dyn GroupAdmissionApi>) -> Self {
        Self { admission }
    }
}

#[async_trait]
impl RejectPolicy for CreationContentPolicy {
    fn name(&self) -> &'static str {
        "channel-creation-content"
    }

    async fn check(&self, event: &Event) -> Verdict {
        self.admission.check_creation(event)
    }
}

/// Rejects channel metadata updates not signed by the channel owner.
pub struct UpdateOwnershipPolicy {
    admission: Arc<dyn GroupAdmissionApi>,
}

impl UpdateOwnershipPolicy {
    /// Wrap an admission service.
    pub fn new(admission: Arc<dyn GroupAdmissionApi>) -> Self {
        Self { admission }
    }
}

#[async_trait]
impl RejectPolicy for UpdateOwnershipPolicy {
    fn name(&self) -> &'static str {
        "channel-update-ownership"
    }

    async fn check(&self, event: &Event) -> Verdict {
        self.admission.check_update(event).await
    }
}

/// The admission policies in registration order.
pub fn admission_policies(admission: Arc<dyn GroupAdmissionApi>) -> Vec<Arc<dyn RejectPolicy>> {
    vec![
        Arc::new(CreationContentPolicy::new(Arc::clone(&admission))),
        Arc::new(UpdateOwnershipPolicy::new(admission)),
    ]
}
