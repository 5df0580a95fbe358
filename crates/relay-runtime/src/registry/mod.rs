//! # Policy Registry
//!
//! Ordered chain of reject policies consulted before an event is stored.
//!
//! Every registered policy runs, in registration order. The event is
//! rejected if any policy rejects it, and the reported reason is the first
//! non-empty rejection message.

use cc_01_group_admission::{RejectPolicy, Verdict};
use shared_types::Event;
use std::sync::Arc;
use tracing::{debug, warn};

/// Ordered set of reject policies.
#[derive(Default, Clone)]
pub struct PolicyChain {
    policies: Vec<Arc<dyn RejectPolicy>>,
}

impl PolicyChain {
    /// Create an empty chain. An empty chain accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a policy.
    pub fn register(&mut self, policy: Arc<dyn RejectPolicy>) {
        debug!("[runtime] Registered reject policy {}", policy.name());
        self.policies.push(policy);
    }

    /// Append several policies, preserving their order.
    pub fn register_all(&mut self, policies: impl IntoIterator<Item = Arc<dyn RejectPolicy>>) {
        for policy in policies {
            self.register(policy);
        }
    }

    /// Names of the registered policies, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.policies.iter().map(|p| p.name()).collect()
    }

    /// Number of registered policies.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Whether no policy is registered.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Run every policy against `event`.
    pub async fn evaluate(&self, event: &Event) -> Verdict {
        let mut outcome = Verdict::accept();
        for policy in &self.policies {
            let verdict = policy.check(event).await;
            if !verdict.reject {
                continue;
            }
            warn!(
                "[runtime] {} rejected {}: {}",
                policy.name(),
                event.short_id(),
                verdict.message
            );
            if !outcome.reject || outcome.message.is_empty() {
                outcome = verdict;
            }
        }
        outcome
    }
}
