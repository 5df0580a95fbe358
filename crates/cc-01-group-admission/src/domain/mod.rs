//! # Domain Layer
//!
//! Pure admission rules with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod entities;
pub mod errors;
pub mod ownership;
pub mod schema;

pub use entities::*;
pub use errors::*;
