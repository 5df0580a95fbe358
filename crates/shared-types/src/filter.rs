//! # Event Filters
//!
//! The subset of relay query filters used for lookups by id, author and kind.
//! Empty fields match everything.

use serde::{Deserialize, Serialize};

use crate::entities::{Event, EventId, Kind, PublicKey};

/// A relay query filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filter {
    /// Exact event ids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<EventId>,
    /// Author public keys.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<PublicKey>,
    /// Event kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<Kind>,
    /// Maximum number of events to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Filter {
    /// Empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a single kind.
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kinds.push(kind);
        self
    }

    /// Restrict to a single author.
    pub fn author(mut self, author: impl Into<PublicKey>) -> Self {
        self.authors.push(author.into());
        self
    }

    /// Restrict to a single id.
    pub fn id(mut self, id: impl Into<EventId>) -> Self {
        self.ids.push(id.into());
        self
    }

    /// Cap the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `event` satisfies every non-empty constraint.
    pub fn matches(&self, event: &Event) -> bool {
        (self.ids.is_empty() || self.ids.iter().any(|id| *id == event.id))
            && (self.authors.is_empty() || self.authors.iter().any(|a| *a == event.pubkey))
            && (self.kinds.is_empty() || self.kinds.contains(&event.kind))
    }
}
