//! # Shared Types Crate
//!
//! This crate contains the event model shared by the admission subsystem
//! and the relay runtime.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Event`, `Tag`, `Kind` and `Filter` are defined here.
//! - **Wire Names**: serde field names follow the relay protocol (`pubkey`,
//!   `created_at`, ...) so events round-trip through JSON untouched.
//! - **Upstream Verification**: signatures are checked before events reach
//!   any consumer of these types.

pub mod entities;
pub mod errors;
pub mod filter;

pub use entities::*;
pub use errors::*;
pub use filter::Filter;
