//! Timer module
//!
//! A single countdown and the derived views (urgency band, display text,
//! progress) a presentation layer reads from it.

pub mod band;
pub mod countdown;

// Re-export main types
pub use band::{Band, TimerStatus};
pub use countdown::{TickOutcome, Timer, DONE_TOKEN};
