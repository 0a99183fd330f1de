//! Logging utilities and structured logging support
//!
//! The kernel itself only emits through the `log` facade; binaries and
//! tests decide whether and how to install a logger.

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system, ignoring an already installed logger
///
/// Safe to call from every test that wants log output.
pub fn try_init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_is_idempotent() {
        try_init();
        try_init();
        trace!("logger installed twice without panicking");
    }
}
