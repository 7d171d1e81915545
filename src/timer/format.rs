//! Duration formatting
//!
//! One formatting policy, used everywhere a second count is shown: the
//! variable-unit form `{D}d {HH}h {MM}m {SS}s`. The day part is omitted
//! when zero, the hour part is omitted when both day and hour are zero,
//! minutes and seconds are always present and zero-padded to two digits.
//! Days are unpadded, hours are two-digit.

/// Render a second count as a duration string
pub fn format_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        format!("{}d {:02}h {:02}m {:02}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{:02}h {:02}m {:02}s", hours, minutes, seconds)
    } else {
        format!("{:02}m {:02}s", minutes, seconds)
    }
}
