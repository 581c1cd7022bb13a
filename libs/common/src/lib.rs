//! Shared utilities for the bridge workspace
//!
//! Provides the error type, hex helpers, logging setup and graceful
//! shutdown handling used by the bridge services.

pub mod error;
pub mod hex;
pub mod logging;
pub mod shutdown;

pub use error::{BridgeError, Result};
pub use shutdown::wait_for_shutdown;
