//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the kernel:
//! - Math types and matrix algorithms
//! - Quaternion helpers
//! - Tolerance-based comparison
//! - Reproducible random sampling
//! - Logging utilities

pub mod math;
pub mod quaternion;
pub mod tolerance;
pub mod random;
pub mod logging;
