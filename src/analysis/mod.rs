//! Analysis and result aggregation modules
//!
//! Result types for the combined tempo and key analysis.

pub mod result;
