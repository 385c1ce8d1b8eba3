//! State management module
//!
//! Server-side ownership of the timer collection.

pub mod app_state;

// Re-export main types
pub use app_state::{AppState, RemoveOutcome};
