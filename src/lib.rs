//! Tickdown - A state-managed HTTP server for countdown and break timers
//!
//! This library provides a countdown timer engine (duration resolution,
//! one-second ticking, break chaining, phase announcements) together with
//! the HTTP surface used to drive it.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
