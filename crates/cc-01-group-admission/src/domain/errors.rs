//! # Admission Errors
//!
//! Error types for channel admission. Every variant is reduced to a
//! reject verdict whose message is the `Display` output.

use shared_types::Kind;
use thiserror::Error;

use crate::ports::outbound::{RelayError, StoreError};

/// Content did not parse into channel metadata.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid content")]
pub struct SchemaError {
    /// Parser diagnostic, kept for logs only.
    pub detail: String,
}

/// Why a remote lookup produced no usable creation event.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// Connecting to or querying the hinted relay failed.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// No relay returned a matching creation event.
    #[error("{kind} channel not found")]
    NotFound {
        /// Kind that was searched for.
        kind: Kind,
    },

    /// The hinted relay returned more than one event for a single id.
    #[error("{kind} channel not found: {count} matching events")]
    Ambiguous {
        /// Kind that was searched for.
        kind: Kind,
        /// Number of events returned.
        count: usize,
    },

    /// The referenced creation event exists but was signed by someone else.
    #[error("{kind} channel owned by another author")]
    Unauthorized {
        /// Kind that was searched for.
        kind: Kind,
    },

    /// The lookup deadline elapsed before the hinted relay answered.
    #[error("{kind} channel lookup timed out")]
    DeadlineExceeded {
        /// Kind that was searched for.
        kind: Kind,
    },
}

impl LookupError {
    /// Not found for channel creation events.
    pub fn not_found() -> Self {
        Self::NotFound {
            kind: Kind::CHANNEL_CREATION,
        }
    }

    /// Whether this error means "exists, wrong owner".
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Errors raised while resolving and validating a channel update.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// The local store could not answer. Fail closed.
    #[error("{kind} channel select error: {source}")]
    Storage {
        /// Kind of the update being validated.
        kind: Kind,
        /// Underlying store fault.
        source: StoreError,
    },

    /// The creation event could not be obtained remotely.
    #[error("failed to get create event: {0}")]
    Lookup(#[from] LookupError),

    /// The update carries no `"e"` tag and the policy requires one.
    #[error("missing channel reference")]
    MissingReference,

    /// The update's own content is malformed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ResolutionError {
    /// Storage fault while validating a metadata update.
    pub fn storage(source: StoreError) -> Self {
        Self::Storage {
            kind: Kind::CHANNEL_METADATA,
            source,
        }
    }
}
