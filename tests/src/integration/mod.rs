//! Cross-crate integration scenarios.

pub mod admission_flows;
pub mod relay_pipeline;
