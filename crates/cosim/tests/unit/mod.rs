//! # Unit Components
//!
//! Per-module unit tests for `cosim-core`.

/// Coverage bridge driver and software model.
pub mod bridge;



/// Reference hart interrupt selection and trap entry.
pub mod hart;
