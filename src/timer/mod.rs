//! Timer engine module
//!
//! The core of the application: duration resolution from user input,
//! time formatting, and the per-second countdown state machine. Everything
//! here is pure or collaborator-driven; the tokio wiring lives in `tasks`.

pub mod format;
pub mod resolver;
pub mod session;

// Re-export main types
pub use format::format_duration;
pub use resolver::{clock_minutes, resolve, ResolveError, ResolvedTimer, StartRequest};
pub use session::{Announce, DisplaySink, TickOutcome, TimerSession};
