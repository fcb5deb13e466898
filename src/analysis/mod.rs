//! Analysis and result aggregation modules
//!
//! Combines envelope and pulse features into per-file results:
//! - Speaking rate and silence-gated energy
//! - Result types
//! - Metadata

pub mod metadata;
pub mod metrics;
pub mod result;
