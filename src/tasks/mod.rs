//! Background tasks module
//!
//! This module contains the session task that runs alongside the HTTP server.

pub mod countdown;

// Re-export main types
pub use countdown::{countdown_session_task, StateDisplay};
