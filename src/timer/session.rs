//! Countdown state machine
//!
//! A [`TimerSession`] owns the remaining-seconds counter and the current
//! phase, and advances one step per call to [`TimerSession::tick`]. It is
//! driven by exactly one periodic trigger at a time (see `tasks::countdown`)
//! and talks to the outside world only through the two collaborator traits.

use tracing::debug;

use crate::state::Phase;

use super::format::format_duration;

/// Display collaborator: receives formatted values and view-state toggles.
/// The server implementation writes snapshots; a browser view would write
/// DOM nodes. Either way the session does not care.
pub trait DisplaySink {
    /// Update the main view with a formatted time and its phase label
    fn update(&mut self, formatted: &str, label: &str);
    /// Update the fullscreen mirror view
    fn mirror(&mut self, formatted: &str);
    /// Toggle the large-text visual state
    fn set_emphasis(&mut self, on: bool);
    /// Request exclusive full-view mode
    fn enter_fullscreen(&mut self);
    /// Leave exclusive full-view mode
    fn exit_fullscreen(&mut self);
}

/// Announcer collaborator: emits a human-readable phase-change message.
/// Implementations must swallow their own failures; announcements are
/// never load-bearing.
pub trait Announce {
    fn announce(&self, message: &str);
}

/// Outcome of a single one-second tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting in the current phase
    Running,
    /// Countdown exhausted and the break began; the driver must start a
    /// fresh periodic trigger whose first tick fires immediately
    BreakStarted,
    /// Session complete
    Finished,
}

/// Ephemeral countdown session.
///
/// The counter is signed: a tick displays the current value, decrements,
/// and transitions when the counter drops below zero. It therefore sits at
/// -1 for one instant but is never displayed negative, and a countdown
/// from N emits exactly N+1 display updates.
#[derive(Debug)]
pub struct TimerSession {
    remaining: i64,
    break_seconds: u64,
    phase: Phase,
}

impl TimerSession {
    /// Create a session ready to count down `duration_seconds`, chaining
    /// into a break of `break_seconds` (0 = no break)
    pub fn new(duration_seconds: u64, break_seconds: u64) -> Self {
        Self {
            // The resolver rejects counts past i64::MAX; saturate rather
            // than wrap negative if one slips through anyway
            remaining: i64::try_from(duration_seconds).unwrap_or(i64::MAX),
            break_seconds,
            phase: Phase::CountingDown,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds still to display, never negative
    pub fn remaining(&self) -> u64 {
        self.remaining.max(0) as u64
    }

    /// Announce the session start and raise the big-text fullscreen view
    pub fn begin(&self, display: &mut dyn DisplaySink, announcer: &dyn Announce) {
        display.set_emphasis(true);
        display.enter_fullscreen();
        announcer.announce("Countdown started!");
    }

    /// One tick: push the remaining time to both views, decrement, and
    /// transition phase when the counter crosses below zero
    pub fn tick(&mut self, display: &mut dyn DisplaySink, announcer: &dyn Announce) -> TickOutcome {
        if !self.phase.is_active() {
            return TickOutcome::Finished;
        }

        let formatted = format_duration(self.remaining());
        display.update(&formatted, self.phase.label());
        display.mirror(&formatted);

        self.remaining -= 1;
        if self.remaining >= 0 {
            return TickOutcome::Running;
        }

        match self.phase {
            Phase::CountingDown if self.break_seconds > 0 => {
                debug!("Countdown exhausted, chaining into {}s break", self.break_seconds);
                announcer.announce("Break started!");
                self.phase = Phase::OnBreak;
                self.remaining = i64::try_from(self.break_seconds).unwrap_or(i64::MAX);
                TickOutcome::BreakStarted
            }
            Phase::CountingDown => {
                announcer.announce("Countdown finished! Well done.");
                self.finish(display)
            }
            _ => {
                announcer.announce("Break is over! Timer finished.");
                self.finish(display)
            }
        }
    }

    fn finish(&mut self, display: &mut dyn DisplaySink) -> TickOutcome {
        self.phase = Phase::Finished;
        display.set_emphasis(false);
        display.exit_fullscreen();
        TickOutcome::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingDisplay {
        updates: Vec<(String, String)>,
        mirrors: Vec<String>,
        emphasis: Vec<bool>,
        fullscreen: Vec<bool>,
    }

    impl DisplaySink for RecordingDisplay {
        fn update(&mut self, formatted: &str, label: &str) {
            self.updates.push((formatted.to_string(), label.to_string()));
        }

        fn mirror(&mut self, formatted: &str) {
            self.mirrors.push(formatted.to_string());
        }

        fn set_emphasis(&mut self, on: bool) {
            self.emphasis.push(on);
        }

        fn enter_fullscreen(&mut self) {
            self.fullscreen.push(true);
        }

        fn exit_fullscreen(&mut self) {
            self.fullscreen.push(false);
        }
    }

    #[derive(Default)]
    struct RecordingAnnouncer {
        messages: RefCell<Vec<String>>,
    }

    impl Announce for RecordingAnnouncer {
        fn announce(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    fn run_to_finish(
        session: &mut TimerSession,
        display: &mut RecordingDisplay,
        announcer: &RecordingAnnouncer,
    ) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        loop {
            let outcome = session.tick(display, announcer);
            outcomes.push(outcome);
            if outcome == TickOutcome::Finished {
                return outcomes;
            }
        }
    }

    #[test]
    fn countdown_without_break_emits_n_plus_one_updates() {
        let mut session = TimerSession::new(3, 0);
        let mut display = RecordingDisplay::default();
        let announcer = RecordingAnnouncer::default();

        let outcomes = run_to_finish(&mut session, &mut display, &announcer);

        assert_eq!(
            outcomes,
            vec![
                TickOutcome::Running,
                TickOutcome::Running,
                TickOutcome::Running,
                TickOutcome::Finished,
            ]
        );
        let values: Vec<&str> = display.updates.iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(values, vec!["00m 03s", "00m 02s", "00m 01s", "00m 00s"]);
        assert!(display
            .updates
            .iter()
            .all(|(_, label)| label == "Total Countdown:"));
        assert_eq!(display.mirrors.len(), display.updates.len());
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(
            *announcer.messages.borrow(),
            vec!["Countdown finished! Well done."]
        );
    }

    #[test]
    fn break_phase_emits_its_own_updates() {
        let mut session = TimerSession::new(2, 2);
        let mut display = RecordingDisplay::default();
        let announcer = RecordingAnnouncer::default();

        let outcomes = run_to_finish(&mut session, &mut display, &announcer);

        // 2+1 countdown ticks, the last one opening the break, then 2+1
        // break ticks
        assert_eq!(outcomes.len(), 6);
        assert_eq!(outcomes[2], TickOutcome::BreakStarted);
        assert_eq!(outcomes[5], TickOutcome::Finished);

        let break_updates: Vec<&(String, String)> = display
            .updates
            .iter()
            .filter(|(_, label)| label == "Break Time:")
            .collect();
        assert_eq!(break_updates.len(), 3);
        assert_eq!(break_updates[0].0, "00m 02s");
        assert_eq!(break_updates[2].0, "00m 00s");

        assert_eq!(
            *announcer.messages.borrow(),
            vec!["Break started!", "Break is over! Timer finished."]
        );
    }

    #[test]
    fn begin_raises_emphasis_and_fullscreen() {
        let session = TimerSession::new(1, 0);
        let mut display = RecordingDisplay::default();
        let announcer = RecordingAnnouncer::default();

        session.begin(&mut display, &announcer);

        assert_eq!(display.emphasis, vec![true]);
        assert_eq!(display.fullscreen, vec![true]);
        assert_eq!(*announcer.messages.borrow(), vec!["Countdown started!"]);
    }

    #[test]
    fn finish_drops_emphasis_and_fullscreen() {
        let mut session = TimerSession::new(0, 0);
        let mut display = RecordingDisplay::default();
        let announcer = RecordingAnnouncer::default();

        session.begin(&mut display, &announcer);
        let outcome = session.tick(&mut display, &announcer);

        assert_eq!(outcome, TickOutcome::Finished);
        assert_eq!(display.emphasis, vec![true, false]);
        assert_eq!(display.fullscreen, vec![true, false]);
        // A zero-length countdown still displays its single 0 tick
        assert_eq!(display.updates.len(), 1);
    }

    #[test]
    fn counter_saturates_at_the_signed_limit() {
        let session = TimerSession::new(u64::MAX, 0);
        assert_eq!(session.remaining(), i64::MAX as u64);
        assert_eq!(session.phase(), Phase::CountingDown);
    }

    #[test]
    fn ticking_a_finished_session_is_inert() {
        let mut session = TimerSession::new(0, 0);
        let mut display = RecordingDisplay::default();
        let announcer = RecordingAnnouncer::default();

        session.tick(&mut display, &announcer);
        let updates_after_finish = display.updates.len();

        assert_eq!(
            session.tick(&mut display, &announcer),
            TickOutcome::Finished
        );
        assert_eq!(display.updates.len(), updates_after_finish);
        assert_eq!(session.remaining(), 0);
    }
}
