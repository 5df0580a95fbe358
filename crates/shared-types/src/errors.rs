//! # Error Types
//!
//! Errors raised while handling raw events.

use thiserror::Error;

/// Errors that can occur when decoding an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The payload is not a well-formed event object.
    #[error("Invalid event JSON: {0}")]
    InvalidJson(String),
}
