//! Utility functions module
//!
//! Clock reading and process signal handling.

pub mod clock;
pub mod signals;

// Re-export main functions
pub use clock::now_seconds;
pub use signals::shutdown_signal;
