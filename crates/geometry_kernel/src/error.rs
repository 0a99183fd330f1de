//! Kernel error types
//!
//! Degenerate geometry is never an error; these cover the boundaries where
//! data enters the kernel from outside.

use crate::config::ConfigError;

/// Errors raised at the kernel's serialization and configuration boundaries
#[derive(thiserror::Error, Debug)]
pub enum KernelError {
    /// A generic value lacks a required field
    #[error("missing field: {0}")]
    MissingField(String),

    /// A generic value field has the wrong shape
    #[error("field '{field}' has an invalid value: {reason}")]
    InvalidField {
        /// Field name
        field: String,
        /// What was wrong with it
        reason: String,
    },

    /// A generic value names a shape the kernel does not know
    #[error("unknown bounding volume shape: {0}")]
    UnknownShape(String),

    /// Vertex memory cannot be read as positions
    #[error("vertex layout error: {0}")]
    VertexLayout(String),

    /// Configuration failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be loaded or saved
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for kernel operations
pub type KernelResult<T> = Result<T, KernelError>;
