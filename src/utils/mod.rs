//! Common utilities and helpers

pub mod logging;

/// Formatting helpers for human-readable summaries
pub struct Utils;

impl Utils {
    /// Format whole seconds as `"1 h 2 m 3 s"`, omitting zero units
    pub fn format_duration_words(seconds: f64) -> String {
        let total = if seconds.is_finite() && seconds > 0.0 {
            seconds.trunc() as u64
        } else {
            0
        };
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let secs = total % 60;

        let mut words = Vec::new();
        if hours > 0 {
            words.push(format!("{} h", hours));
        }
        if minutes > 0 {
            words.push(format!("{} m", minutes));
        }
        if secs > 0 || words.is_empty() {
            words.push(format!("{} s", secs));
        }
        words.join(" ")
    }
}
