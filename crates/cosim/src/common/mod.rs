//! Common types shared across the co-simulation plumbing.
//!
//! This module provides the pieces every other module leans on:
//! 1. **Constants:** Fixed artifact names, plusargs, and default file locations.
//! 2. **Error Handling:** One error enum per concern, all built on `thiserror`.

/// Fixed artifact names and defaults.
pub mod constants;

/// Error types for semaphores, coordination, configuration, schedules, images and trials.
pub mod error;

pub use error::{ConfigError, ImageError, ScheduleError, SemError, SyncError, TrialError};
