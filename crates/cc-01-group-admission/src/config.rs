//! # Admission Configuration
//!
//! Tunables for the group admission service: the fallback relay pool used
//! when an update carries no relay hint, the lookup deadlines, and the
//! policy for updates that carry no channel reference at all.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Well-known public relays queried when an update has no relay hint.
pub const DEFAULT_FALLBACK_RELAYS: [&str; 6] = [
    "wss://purplepag.es",
    "wss://relay.nos.social",
    "wss://user.kindpag.es",
    "wss://relay.nostr.band",
    "wss://relay.damus.io",
    "wss://relay.snort.net",
];

/// What to do when an update event has no `"e"` tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReferencePolicy {
    /// Continue with an empty referenced id. Nothing can match it, so the
    /// update is eventually rejected as not found after the pool lookup.
    #[default]
    FallThrough,
    /// Reject immediately with "missing channel reference".
    Reject,
}

/// Group admission configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Relays queried concurrently when no relay hint is given.
    pub fallback_relays: Vec<String>,

    /// Overall bound on one remote lookup, in milliseconds.
    pub lookup_timeout_ms: u64,

    /// Bound on a single relay connection attempt, in milliseconds.
    pub connect_timeout_ms: u64,

    /// Handling of updates without a channel reference.
    pub missing_reference: MissingReferencePolicy,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            fallback_relays: DEFAULT_FALLBACK_RELAYS
                .iter()
                .map(|url| (*url).to_string())
                .collect(),
            lookup_timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
            missing_reference: MissingReferencePolicy::FallThrough,
        }
    }
}

impl AdmissionConfig {
    /// Create a config for testing (no fallback relays, short deadlines).
    pub fn for_testing() -> Self {
        Self {
            fallback_relays: Vec::new(),
            lookup_timeout_ms: 500,
            connect_timeout_ms: 200,
            missing_reference: MissingReferencePolicy::FallThrough,
        }
    }

    /// Replace the fallback relay pool.
    pub fn with_fallback_relays<I, S>(mut self, relays: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_relays = relays.into_iter().map(Into::into).collect();
        self
    }

    /// Overall lookup deadline.
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Per-connection deadline.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
