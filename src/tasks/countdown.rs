//! Countdown session background task

use std::{sync::Arc, time::Duration};

use tokio::time::{interval, sleep};
use tracing::{debug, error, info};

use crate::{
    services::SpeechAnnouncer,
    state::{AppState, DisplayState, Phase, TimerState},
    timer::{Announce, DisplaySink, ResolvedTimer, TickOutcome, TimerSession},
};

/// Display sink that writes into the shared [`DisplayState`] snapshot
pub struct StateDisplay {
    state: Arc<AppState>,
}

impl StateDisplay {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    fn apply<F>(&self, updater: F)
    where
        F: FnOnce(&mut DisplayState),
    {
        if let Err(e) = self.state.update_display(updater) {
            error!("Failed to update display state: {}", e);
        }
    }
}

impl DisplaySink for StateDisplay {
    fn update(&mut self, formatted: &str, label: &str) {
        debug!("Display update: {} {}", label, formatted);
        let formatted = formatted.to_string();
        let label = label.to_string();
        self.apply(move |display| {
            display.main = formatted;
            display.label = label;
        });
    }

    fn mirror(&mut self, formatted: &str) {
        let formatted = formatted.to_string();
        self.apply(move |display| display.fullscreen_mirror = formatted);
    }

    fn set_emphasis(&mut self, on: bool) {
        self.apply(move |display| display.emphasized = on);
    }

    fn enter_fullscreen(&mut self) {
        self.apply(|display| display.fullscreen = true);
    }

    fn exit_fullscreen(&mut self) {
        self.apply(|display| display.fullscreen = false);
    }
}

/// Background task that drives one timer session from (optional) scheduled
/// wait through countdown, break, and completion.
///
/// Exactly one of these runs at a time; `AppState::clear_session` aborts
/// the previous one before a new one is spawned. No lock is ever held
/// across an await, so aborting at any point is safe.
pub async fn countdown_session_task(
    state: Arc<AppState>,
    resolved: ResolvedTimer,
    announcer: SpeechAnnouncer,
) {
    let mut display = StateDisplay::new(Arc::clone(&state));

    if resolved.wait_minutes > 0 {
        let start_label = resolved.scheduled_start.clone().unwrap_or_default();
        info!(
            "Deferring countdown start until {} ({} minutes)",
            start_label, resolved.wait_minutes
        );
        announcer.announce(&format!(
            "Timer will start at {}. Waiting to begin.",
            start_label
        ));
        publish(&state, TimerState::scheduled(start_label));

        sleep(Duration::from_secs(resolved.wait_minutes * 60)).await;
    }

    info!(
        "Starting countdown: {}s total, {}s break",
        resolved.duration_seconds, resolved.break_seconds
    );

    let mut session = TimerSession::new(resolved.duration_seconds, resolved.break_seconds);
    session.begin(&mut display, &announcer);

    // The one-second periodic trigger; the first tick fires immediately
    let mut ticker = interval(Duration::from_secs(1));
    loop {
        ticker.tick().await;

        let shown = session.remaining();
        match session.tick(&mut display, &announcer) {
            TickOutcome::Running => {
                publish(&state, TimerState::running(session.phase(), shown));
            }
            TickOutcome::BreakStarted => {
                publish(&state, TimerState::running(Phase::OnBreak, session.remaining()));
                // Fresh trigger for the break phase, immediate first tick
                ticker = interval(Duration::from_secs(1));
            }
            TickOutcome::Finished => {
                publish(&state, TimerState::finished());
                break;
            }
        }
    }

    info!("Countdown session finished");
}

fn publish(state: &AppState, snapshot: TimerState) {
    if let Err(e) = state.update_timer_state(snapshot) {
        error!("Failed to publish timer state: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            SpeechAnnouncer::silent(),
        ))
    }

    fn immediate(duration_seconds: u64, break_seconds: u64) -> ResolvedTimer {
        ResolvedTimer {
            duration_seconds,
            break_seconds,
            wait_minutes: 0,
            scheduled_start: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn session_runs_to_finished() {
        let state = test_state();

        countdown_session_task(Arc::clone(&state), immediate(2, 0), SpeechAnnouncer::silent())
            .await;

        let timer = state.get_timer_state().unwrap();
        assert_eq!(timer.phase, Phase::Finished);
        assert_eq!(timer.remaining_seconds, None);

        let display = state.get_display_state().unwrap();
        assert_eq!(display.main, "00m 00s");
        assert_eq!(display.fullscreen_mirror, "00m 00s");
        assert!(!display.emphasized);
        assert!(!display.fullscreen);
    }

    #[tokio::test(start_paused = true)]
    async fn session_chains_into_break() {
        let state = test_state();
        let mut rx = state.timer_update_tx.subscribe();

        let task = tokio::spawn(countdown_session_task(
            Arc::clone(&state),
            immediate(1, 2),
            SpeechAnnouncer::silent(),
        ));

        let mut saw_countdown = false;
        let mut saw_break = false;
        loop {
            rx.changed().await.unwrap();
            let snapshot = rx.borrow_and_update().clone();
            match snapshot.phase {
                Phase::CountingDown => saw_countdown = true,
                Phase::OnBreak => saw_break = true,
                Phase::Finished => break,
                Phase::Idle => {}
            }
        }
        task.await.unwrap();

        assert!(saw_countdown);
        assert!(saw_break);
        // The break owned the display when the session ended
        assert_eq!(state.get_display_state().unwrap().label, "Break Time:");
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_session_publishes_schedule_then_runs() {
        let state = test_state();
        let mut rx = state.timer_update_tx.subscribe();

        let resolved = ResolvedTimer {
            duration_seconds: 1,
            break_seconds: 0,
            wait_minutes: 1,
            scheduled_start: Some("09:30".to_string()),
        };
        let task = tokio::spawn(countdown_session_task(
            Arc::clone(&state),
            resolved,
            SpeechAnnouncer::silent(),
        ));

        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.scheduled_start.as_deref(), Some("09:30"));

        task.await.unwrap();
        assert_eq!(state.get_timer_state().unwrap().phase, Phase::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_session_stops_publishing() {
        let state = test_state();

        let handle = tokio::spawn(countdown_session_task(
            Arc::clone(&state),
            immediate(1_000, 0),
            SpeechAnnouncer::silent(),
        ));
        state.store_session(handle).unwrap();

        // Let the session publish its first ticks
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(state.get_timer_state().unwrap().phase, Phase::CountingDown);

        assert!(state.clear_session().unwrap());
        state.reset_to_idle().unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state.get_timer_state().unwrap().phase, Phase::Idle);
        assert!(state.get_display_state().unwrap().main.is_empty());
    }
}
