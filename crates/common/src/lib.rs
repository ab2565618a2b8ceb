//! fgradient Common Utilities
//!
//! Shared infrastructure for all fgradient crates:
//! - Error types, result aliases, and user-facing failure messages
//! - Timestamp and transient-acknowledgment helpers
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
