//! External service integration module
//!
//! This module contains the speech synthesis integration used for
//! phase-change announcements.

pub mod speech;

// Re-export main types
pub use speech::{check_speech_available, SpeechAnnouncer};
