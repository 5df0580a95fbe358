//! # Relay Admission Test Suite
//!
//! Cross-crate scenarios for channel admission.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── admission_flows.rs   # Verdicts through GroupAdmissionService
//!     └── relay_pipeline.rs    # Submissions through RelayRuntime
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cc-tests
//! cargo test -p cc-tests integration::relay_pipeline::
//! ```

pub mod integration;
