//! # Core Event Entities
//!
//! Defines the signed event model exchanged between clients and relays.
//!
//! ## Clusters
//!
//! - **Event**: `Event`, `Tag`, `Kind`
//! - **Identity**: `EventId`, `PublicKey` (lowercase hex strings)
//!
//! Signatures are verified upstream of every consumer of this crate. The
//! `sig` field is carried through untouched.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::errors::EventError;

// =============================================================================
// IDENTITY
// =============================================================================

/// Hex-encoded SHA-256 of the canonical event serialization.
pub type EventId = String;

/// Hex-encoded x-only public key of the event author.
pub type PublicKey = String;

// =============================================================================
// KIND
// =============================================================================

/// Integer discriminator describing the semantic type of an event.
///
/// Kinds are defined over `0..=65535`. Wire events with a kind outside that
/// range fail to parse with [`EventError::InvalidJson`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kind(pub u16);

impl Kind {
    /// Short text note.
    pub const TEXT_NOTE: Kind = Kind(1);
    /// Channel (group) creation. The author becomes the channel owner.
    pub const CHANNEL_CREATION: Kind = Kind(40);
    /// Channel metadata update. Must reference a creation event by the same author.
    pub const CHANNEL_METADATA: Kind = Kind(41);
    /// Message posted to a channel.
    pub const CHANNEL_MESSAGE: Kind = Kind(42);

    /// Raw numeric value.
    #[must_use]
    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for Kind {
    fn from(value: u16) -> Self {
        Kind(value)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// TAG
// =============================================================================

/// Marker of a tag referencing another event.
pub const EVENT_REFERENCE_MARKER: &str = "e";

/// An ordered list of strings attached to an event, e.g. `["e", <id>, <relay>]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub Vec<String>);

impl Tag {
    /// Build a tag from string slices.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Tag(fields.into_iter().map(Into::into).collect())
    }

    /// Convenience constructor for an `["e", id, relay]` reference.
    pub fn event_reference(event_id: &str, relay_hint: &str) -> Self {
        Tag::new([EVENT_REFERENCE_MARKER, event_id, relay_hint])
    }

    /// First element of the tag (`"e"`, `"p"`, ...).
    pub fn marker(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Second element of the tag.
    pub fn value(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    /// Third element of the tag. For `"e"` tags this is the relay hint.
    pub fn relay_hint(&self) -> Option<&str> {
        self.0.get(2).map(String::as_str)
    }

    /// Whether this tag references another event.
    pub fn is_event_reference(&self) -> bool {
        self.marker() == Some(EVENT_REFERENCE_MARKER)
    }
}

// =============================================================================
// EVENT
// =============================================================================

/// A signed, timestamped, typed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier (hex of SHA-256 of the canonical serialization).
    pub id: EventId,
    /// Author public key.
    pub pubkey: PublicKey,
    /// Unix timestamp in seconds.
    pub created_at: u64,
    /// Semantic type.
    pub kind: Kind,
    /// Ordered tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Free-form content; JSON for channel kinds.
    #[serde(default)]
    pub content: String,
    /// Schnorr signature, verified upstream.
    #[serde(default)]
    pub sig: String,
}

impl Event {
    /// Create an unsigned event and compute its id.
    pub fn new(
        pubkey: impl Into<PublicKey>,
        created_at: u64,
        kind: Kind,
        tags: Vec<Tag>,
        content: impl Into<String>,
    ) -> Self {
        let mut event = Self {
            id: String::new(),
            pubkey: pubkey.into(),
            created_at,
            kind,
            tags,
            content: content.into(),
            sig: String::new(),
        };
        event.id = event.compute_id();
        event
    }

    /// Parse an event from its JSON representation.
    pub fn from_json(raw: &str) -> Result<Self, EventError> {
        serde_json::from_str(raw).map_err(|e| EventError::InvalidJson(e.to_string()))
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> String {
        // Serializing plain strings, integers and string vectors cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Compute the canonical id: `sha256([0, pubkey, created_at, kind, tags, content])`.
    pub fn compute_id(&self) -> EventId {
        let canonical = serde_json::json!([
            0,
            self.pubkey,
            self.created_at,
            self.kind,
            self.tags,
            self.content
        ]);
        let digest = Sha256::digest(canonical.to_string().as_bytes());
        hex::encode(digest)
    }

    /// Whether `id` matches the canonical serialization.
    pub fn has_valid_id(&self) -> bool {
        self.id == self.compute_id()
    }

    /// First tag whose marker is `"e"`.
    pub fn first_event_reference(&self) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.is_event_reference())
    }

    /// Short id for log lines.
    pub fn short_id(&self) -> &str {
        let end = self.id.len().min(12);
        self.id.get(..end).unwrap_or(&self.id)
    }
}
