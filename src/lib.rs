//! Named Timers - A multi-timer countdown manager
//!
//! The core is a drift-safe countdown state machine ([`timer::Timer`]) and a
//! collection that owns naming, lifecycle, batched ticking and change
//! notification ([`collection::TimerCollection`]). The remaining modules
//! serve that collection over a small JSON API.

pub mod config;
pub mod timer;
pub mod collection;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use timer::{Band, Timer, TimerStatus};
pub use collection::{Counts, RenameError, SortOrder, TickReport, TimerCollection};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
