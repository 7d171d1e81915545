//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{info, warn};

use crate::services::SpeechAnnouncer;
use crate::timer::format_duration;

use super::{DisplayState, TimerState};

/// Main application state that manages the timer session and its snapshots
#[derive(Debug)]
pub struct AppState {
    /// Latest timer snapshot (phase, remaining seconds, scheduled start)
    pub timer_state: Arc<Mutex<TimerState>>,
    /// Latest formatted display snapshot
    pub display_state: Arc<Mutex<DisplayState>>,
    /// Handle of the one active session task; starting or cancelling a
    /// session aborts whatever lives here first
    session_task: Mutex<Option<JoinHandle<()>>>,
    /// Announcer shared with every session task
    pub announcer: SpeechAnnouncer,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerState>,
}

impl AppState {
    /// Create a new AppState with an idle timer
    pub fn new(port: u16, host: String, announcer: SpeechAnnouncer) -> Self {
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerState::idle());

        Self {
            timer_state: Arc::new(Mutex::new(TimerState::idle())),
            display_state: Arc::new(Mutex::new(DisplayState::blank())),
            session_task: Mutex::new(None),
            announcer,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Publish a new timer snapshot and notify watchers
    pub fn update_timer_state(&self, snapshot: TimerState) -> Result<(), String> {
        let mut timer_state = self.timer_state.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        *timer_state = snapshot.clone();
        drop(timer_state); // Release the lock early

        // Notify timer state watchers
        if let Err(e) = self.timer_update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }

        Ok(())
    }

    /// Apply an update to the display snapshot
    pub fn update_display<F>(&self, updater: F) -> Result<(), String>
    where
        F: FnOnce(&mut DisplayState),
    {
        let mut display = self.display_state.lock()
            .map_err(|e| format!("Failed to lock display state: {}", e))?;

        updater(&mut display);
        Ok(())
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.timer_state.lock()
            .map(|state| state.clone())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Get current display state
    pub fn get_display_state(&self) -> Result<DisplayState, String> {
        self.display_state.lock()
            .map(|state| state.clone())
            .map_err(|e| format!("Failed to lock display state: {}", e))
    }

    /// Take the active session handle out of its slot, if any
    fn take_session(&self) -> Result<Option<JoinHandle<()>>, String> {
        let mut slot = self.session_task.lock()
            .map_err(|e| format!("Failed to lock session task: {}", e))?;
        Ok(slot.take())
    }

    /// Abort the active session task, if any. Returns whether one existed.
    ///
    /// Does not wait for the task to retire; use [`AppState::stop_session`]
    /// wherever snapshots are reset afterwards.
    pub fn clear_session(&self) -> Result<bool, String> {
        match self.take_session()? {
            Some(previous) => {
                info!("Aborting active session task");
                previous.abort();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Abort the active session task and wait until its final poll has
    /// retired. Returns whether one existed.
    ///
    /// Only one periodic trigger may be alive at a time, so this runs before
    /// every new session is spawned and on every explicit cancel. Waiting
    /// matters: a tick body already running on another worker may still
    /// publish a snapshot, which must land before the caller resets to idle
    /// or spawns a replacement.
    pub async fn stop_session(&self) -> Result<bool, String> {
        match self.take_session()? {
            Some(previous) => {
                info!("Aborting active session task");
                previous.abort();
                let _ = previous.await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Store the handle of a freshly spawned session task
    pub fn store_session(&self, handle: JoinHandle<()>) -> Result<(), String> {
        let mut slot = self.session_task.lock()
            .map_err(|e| format!("Failed to lock session task: {}", e))?;

        if let Some(previous) = slot.take() {
            // clear_session should have run first; abort defensively anyway
            warn!("Replacing a session task that was never cleared");
            previous.abort();
        }
        *slot = Some(handle);
        Ok(())
    }

    /// Reset timer and display snapshots back to idle
    pub fn reset_to_idle(&self) -> Result<(), String> {
        self.update_timer_state(TimerState::idle())?;
        self.update_display(|display| *display = DisplayState::blank())?;
        Ok(())
    }

    /// Record the last user-facing action for the status endpoint
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_duration(self.start_time.elapsed().as_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Phase;

    fn test_state() -> AppState {
        AppState::new(0, "127.0.0.1".to_string(), SpeechAnnouncer::silent())
    }

    #[tokio::test]
    async fn timer_updates_reach_watchers() {
        let state = test_state();
        let mut rx = state.timer_update_tx.subscribe();

        state
            .update_timer_state(TimerState::running(Phase::CountingDown, 10))
            .unwrap();

        rx.changed().await.unwrap();
        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.phase, Phase::CountingDown);
        assert_eq!(snapshot.remaining_seconds, Some(10));
    }

    #[tokio::test]
    async fn clear_session_reports_presence() {
        let state = test_state();
        assert!(!state.clear_session().unwrap());

        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        });
        state.store_session(handle).unwrap();
        assert!(state.clear_session().unwrap());
        assert!(!state.clear_session().unwrap());
    }

    #[tokio::test]
    async fn stop_session_waits_for_the_task() {
        let state = test_state();
        assert!(!state.stop_session().await.unwrap());

        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        });
        state.store_session(handle).unwrap();

        // Returns only once the aborted task has retired
        assert!(state.stop_session().await.unwrap());
        assert!(!state.stop_session().await.unwrap());
    }

    #[test]
    fn reset_clears_snapshots() {
        let state = test_state();
        state
            .update_timer_state(TimerState::running(Phase::OnBreak, 5))
            .unwrap();
        state
            .update_display(|display| {
                display.main = "00m 05s".to_string();
                display.emphasized = true;
            })
            .unwrap();

        state.reset_to_idle().unwrap();

        assert_eq!(state.get_timer_state().unwrap().phase, Phase::Idle);
        let display = state.get_display_state().unwrap();
        assert!(display.main.is_empty());
        assert!(!display.emphasized);
    }

    #[test]
    fn record_action_is_reported() {
        let state = test_state();
        assert_eq!(state.get_last_action().0, None);

        state.record_action("start");
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());
    }
}
