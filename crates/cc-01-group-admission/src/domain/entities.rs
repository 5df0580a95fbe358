//! # Domain Entities
//!
//! Core data structures for channel admission.

use serde::Serialize;
use shared_types::{Event, EventId, PublicKey};

// =============================================================================
// Channel Metadata
// =============================================================================

/// Display state of a channel, carried as the JSON content of kind 40/41 events.
///
/// There is no identity field: the owner is the author of the creation event.
/// Decoding goes through [`parse_metadata`](super::schema::parse_metadata).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupMetadata {
    /// Channel name.
    pub name: String,
    /// Channel description.
    pub about: String,
    /// Picture URL.
    pub picture: String,
    /// Relays where channel events can be found, in preference order.
    pub relays: Vec<String>,
}

// =============================================================================
// Reference
// =============================================================================

/// The channel reference of an update event (first `"e"` tag).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceTag {
    /// Id of the referenced creation event. Empty if the tag had no value.
    pub referenced_event_id: EventId,
    /// Relay that should know the creation event. May be empty.
    pub relay_hint: String,
}

impl ReferenceTag {
    /// Whether a relay hint was supplied.
    pub fn has_hint(&self) -> bool {
        !self.relay_hint.is_empty()
    }
}

/// What the ownership lookups search for: a creation event with this id
/// signed by this author.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreationTarget {
    /// Referenced creation event id.
    pub event_id: EventId,
    /// Author of the update, who must also be the channel owner.
    pub author: PublicKey,
}

impl CreationTarget {
    /// Build a target from an update's author and its reference.
    pub fn new(author: impl Into<PublicKey>, event_id: impl Into<EventId>) -> Self {
        Self {
            event_id: event_id.into(),
            author: author.into(),
        }
    }
}

// =============================================================================
// Creation Proof
// =============================================================================

/// Where the referenced creation event was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProofSource {
    /// The local event store.
    Local,
    /// The relay named by the update's hint.
    RemoteHint,
    /// One of the fallback relays.
    RemotePool,
}

/// Result of resolving a channel reference. Computed per validation and
/// never cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreationProof {
    /// Whether the creation event exists under the update's author.
    pub found: bool,
    /// Where it was found.
    pub source: ProofSource,
    /// The creation event, when fetched from a relay. Local hits only count rows.
    pub event: Option<Event>,
}

impl CreationProof {
    /// Proof from a local count hit.
    pub fn local() -> Self {
        Self {
            found: true,
            source: ProofSource::Local,
            event: None,
        }
    }

    /// Proof from a remote relay.
    pub fn remote(source: ProofSource, event: Event) -> Self {
        Self {
            found: true,
            source,
            event: Some(event),
        }
    }
}

// =============================================================================
// Verdict
// =============================================================================

/// Accept/reject decision handed back to the protocol engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the event must be refused.
    pub reject: bool,
    /// Reason shown to the submitting client. Empty on accept.
    pub message: String,
}

impl Verdict {
    /// Accept the event.
    pub fn accept() -> Self {
        Self::default()
    }

    /// Reject the event with a reason.
    pub fn reject(message: impl Into<String>) -> Self {
        Self {
            reject: true,
            message: message.into(),
        }
    }

    /// Whether the event is accepted.
    pub fn is_accepted(&self) -> bool {
        !self.reject
    }

    /// `(reject, message)` pair as consumed by the protocol engine.
    pub fn into_parts(self) -> (bool, String) {
        (self.reject, self.message)
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for Verdict {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Verdict::accept(),
            Err(e) => Verdict::reject(e.to_string()),
        }
    }
}
