//! Background tasks module
//!
//! Tasks that run alongside the HTTP server.

pub mod change_log;
pub mod ticker;

// Re-export main functions
pub use change_log::change_log_task;
pub use ticker::{tick_once, ticker_task};
