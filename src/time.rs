//! Time-of-Day Module
//!
//! Conversion between fractional minutes since local midnight and the
//! integer hour/minute/second clock the engine and the dataset use.

use std::fmt;

pub const MINUTES_PER_DAY: f64 = 1440.0;

// ===================== CLOCK TIME =====================

/// Local clock time with whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl ClockTime {
    pub const fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self { hour, minute, second }
    }

    /// Decompose fractional minutes since midnight.
    ///
    /// Sub-second precision is truncated, never rounded, so the clock time is
    /// always at or before the requested instant. Negative input is treated
    /// as midnight.
    pub fn from_minutes(minutes: f64) -> Self {
        let minutes = if minutes.is_finite() { minutes.max(0.0) } else { 0.0 };
        let whole = minutes.floor();
        let second = ((minutes - whole) * 60.0).floor() as u32;
        let whole = whole as u32;
        Self { hour: whole / 60, minute: whole % 60, second: second.min(59) }
    }

    /// Seconds since midnight.
    pub fn seconds_of_day(&self) -> u32 {
        self.hour * 3600 + self.minute * 60 + self.second
    }

    /// Fractional hours since midnight.
    pub fn as_hours(&self) -> f64 {
        self.hour as f64 + self.minute as f64 / 60.0 + self.second as f64 / 3600.0
    }

    /// Fractional minutes since midnight.
    pub fn as_minutes(&self) -> f64 {
        (60 * self.hour + self.minute) as f64 + self.second as f64 / 60.0
    }

    /// Seconds since midnight as a float, for the dataset.
    pub fn as_seconds(&self) -> f64 {
        self.seconds_of_day() as f64
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

// ===================== FORMATTING =====================

/// Format a duration in seconds as "Xh Ym Zs".
///
/// Negative durations are formatted by magnitude.
pub fn format_hms(seconds: i64) -> String {
    let total = seconds.abs();
    if total == 0 {
        return "0s".to_string();
    }

    let parts = [(total / 3600, "h"), ((total % 3600) / 60, "m"), (total % 60, "s")];
    parts
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format fractional minutes since midnight as HH:MM:SS.
pub fn format_minutes(minutes: f64) -> String {
    ClockTime::from_minutes(minutes).to_string()
}

// ===================== TESTS =====================
