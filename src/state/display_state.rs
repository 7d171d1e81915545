//! Display snapshot structure
//!
//! Server-side mirror of the two timer views: the main display with its
//! phase label and the fullscreen overlay. Clients poll this through the
//! status endpoint and render it however they like.

use serde::{Deserialize, Serialize};

/// Formatted view of the running timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayState {
    /// Main view value, e.g. "01h 30m 00s"
    pub main: String,
    /// Main view label, e.g. "Total Countdown:"
    pub label: String,
    /// Fullscreen overlay value, kept in lockstep with the main view
    pub fullscreen_mirror: String,
    /// Large-text visual state, raised while a session is ticking
    pub emphasized: bool,
    /// Whether the view should be in exclusive fullscreen mode
    pub fullscreen: bool,
}

impl DisplayState {
    /// Create a blank display with no timer shown
    pub fn blank() -> Self {
        Self {
            main: String::new(),
            label: String::new(),
            fullscreen_mirror: String::new(),
            emphasized: false,
            fullscreen: false,
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::blank()
    }
}
