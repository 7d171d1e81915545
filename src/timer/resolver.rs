//! Duration resolution and start scheduling arithmetic
//!
//! Turns the raw fields of a start request into a concrete countdown:
//! total seconds, break seconds, and how long to wait when a future start
//! clock-time was given. All functions here are pure; the caller supplies
//! the current wall-clock minutes.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Minutes in a day, the wraparound modulus for clock arithmetic
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parameters of a start request, as received from the client.
/// Missing or non-numeric fields deserialize to their defaults (0 / None),
/// matching the forgiving input handling of the timer form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StartRequest {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    /// Break chained after the countdown, in minutes (0 = no break)
    pub break_minutes: u64,
    /// `HH:MM` clock times; the pair takes effect only when both parse
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Ceiling for any resolved second count, so the signed session counter
/// can always hold it
const MAX_SECONDS: u64 = i64::MAX as u64;

/// Validation error produced by [`resolve`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    EmptyDuration,
    DurationTooLarge,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::EmptyDuration => {
                write!(f, "Please set a valid duration or start/end time.")
            }
            ResolveError::DurationTooLarge => {
                write!(f, "Duration or break is too large.")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Fully resolved countdown parameters, ready to hand to a session task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTimer {
    pub duration_seconds: u64,
    pub break_seconds: u64,
    /// Wall-clock minutes to wait before the countdown begins (0 = now)
    pub wait_minutes: u64,
    /// Canonical `HH:MM` start the wait is aiming for
    pub scheduled_start: Option<String>,
}

impl ResolvedTimer {
    /// Check whether this countdown starts immediately
    pub fn starts_now(&self) -> bool {
        self.wait_minutes == 0
    }
}

/// Parse an `HH:MM` clock string into minutes since midnight
pub fn clock_minutes(value: &str) -> Option<u32> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()?;
    Some(time.hour() * 60 + time.minute())
}

/// Resolve a start request against the current time of day.
///
/// The explicit day/hour/minute/second fields are summed first; a parseable
/// start/end clock pair overrides them. An end clock numerically before the
/// start clock means the interval crosses midnight. A start clock that is
/// not the current minute defers the countdown, wrapped into [0, 1440) so
/// an already-passed start means the same clock time tomorrow, consistent
/// with the overnight rule.
pub fn resolve(request: &StartRequest, now_minutes: u32) -> Result<ResolvedTimer, ResolveError> {
    let mut clock_seconds = None;
    let mut wait_minutes = 0u64;
    let mut scheduled_start = None;

    if let (Some(start_raw), Some(end_raw)) = (&request.start_time, &request.end_time) {
        if let (Some(start), Some(end)) = (clock_minutes(start_raw), clock_minutes(end_raw)) {
            let end = if end < start { end + MINUTES_PER_DAY } else { end };
            clock_seconds = Some(u64::from(end - start) * 60);

            let wait = (start + MINUTES_PER_DAY - (now_minutes % MINUTES_PER_DAY)) % MINUTES_PER_DAY;
            if wait > 0 {
                wait_minutes = u64::from(wait);
                scheduled_start = Some(format!("{:02}:{:02}", start / 60, start % 60));
            }
        }
    }

    // The clock pair overrides the explicit fields, so their sum is only
    // computed (and bounds-checked) when it is actually used
    let duration_seconds = match clock_seconds {
        Some(seconds) => seconds,
        None => field_seconds(request).ok_or(ResolveError::DurationTooLarge)?,
    };
    let break_seconds = request
        .break_minutes
        .checked_mul(60)
        .filter(|&seconds| seconds <= MAX_SECONDS)
        .ok_or(ResolveError::DurationTooLarge)?;

    if duration_seconds == 0 {
        return Err(ResolveError::EmptyDuration);
    }

    Ok(ResolvedTimer {
        duration_seconds,
        break_seconds,
        wait_minutes,
        scheduled_start,
    })
}

/// Sum the explicit duration fields, refusing to wrap on absurd input
fn field_seconds(request: &StartRequest) -> Option<u64> {
    let days = request.days.checked_mul(86_400)?;
    let hours = request.hours.checked_mul(3_600)?;
    let minutes = request.minutes.checked_mul(60)?;
    days.checked_add(hours)?
        .checked_add(minutes)?
        .checked_add(request.seconds)
        .filter(|&total| total <= MAX_SECONDS)
}
