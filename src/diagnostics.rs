//! Engine Diagnostics
//!
//! Closed set of conditions the solar-position engine reports alongside a
//! result. Callers only branch on fatal versus advisory.

use std::fmt;

use log::{debug, error, warn};

/// How a diagnostic affects the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The input was rejected; the accompanying values are sentinels.
    Fatal,
    /// The values are usable but degraded or partly unavailable.
    Advisory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    YearOutOfRange,
    DayOutOfRange,
    HourOutOfRange,
    MinuteOutOfRange,
    SecondOutOfRange,
    TimezoneOutOfRange,
    TemperatureOutOfRange,
    PressureOutOfRange,
    LatitudeOutOfRange,
    LongitudeOutOfRange,
    ComputationFailed,
    /// Refracted zenith beyond 93°, air mass set to the -1 sentinel.
    AirMassUnavailable,
    /// Polar night: no sunrise on this date.
    SunNeverRises,
    /// Polar day: no sunset on this date.
    SunNeverSets,
}

impl Diagnostic {
    pub fn severity(self) -> Severity {
        match self {
            Diagnostic::AirMassUnavailable
            | Diagnostic::SunNeverRises
            | Diagnostic::SunNeverSets => {
                Severity::Advisory
            }
            _ => Severity::Fatal,
        }
    }

    pub fn is_fatal(self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Diagnostic::YearOutOfRange => "year outside the supported delta-T range",
            Diagnostic::DayOutOfRange => "day number does not exist in this year",
            Diagnostic::HourOutOfRange => "hour must be 0-24 (24 only at 24:00:00)",
            Diagnostic::MinuteOutOfRange => "minute must be 0-59",
            Diagnostic::SecondOutOfRange => "second must be 0-59",
            Diagnostic::TimezoneOutOfRange => "timezone must be between -12 and +14 hours",
            Diagnostic::TemperatureOutOfRange => "temperature must be between -100 and 100 °C",
            Diagnostic::PressureOutOfRange => "pressure must be between 0 and 2000 millibar",
            Diagnostic::LatitudeOutOfRange => "latitude must be between -90 and 90",
            Diagnostic::LongitudeOutOfRange => "longitude must be between -180 and 180",
            Diagnostic::ComputationFailed => "solar position computation failed",
            Diagnostic::AirMassUnavailable => "sun too far below the horizon for air mass",
            Diagnostic::SunNeverRises => "sun does not rise on this date",
            Diagnostic::SunNeverSets => "sun does not set on this date",
        };
        f.write_str(msg)
    }
}

// ===================== DIAGNOSTIC SET =====================

/// Diagnostics from one engine call, in detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic once.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if !self.0.contains(&diagnostic) {
            self.0.push(diagnostic);
        }
    }

    pub fn contains(&self, diagnostic: Diagnostic) -> bool {
        self.0.contains(&diagnostic)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_fatal(&self) -> bool {
        self.0.iter().any(|d| d.is_fatal())
    }

    pub fn iter(&self) -> impl Iterator<Item = Diagnostic> + '_ {
        self.0.iter().copied()
    }

    /// Only the fatal codes.
    pub fn fatal(&self) -> Diagnostics {
        Diagnostics(self.iter().filter(|d| d.is_fatal()).collect())
    }

    /// Log every diagnostic against a label such as the clock time.
    ///
    /// Air mass below the horizon is expected around sunrise and only goes to
    /// debug; other advisories are warnings.
    pub fn report(&self, label: &str) {
        for d in self.iter() {
            match (d.severity(), d) {
                (Severity::Fatal, _) => error!("{}: {}", label, d),
                (Severity::Advisory, Diagnostic::AirMassUnavailable) => debug!("{}: {}", label, d),
                (Severity::Advisory, _) => warn!("{}: {}", label, d),
            }
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self.iter().map(|d| d.to_string()).collect();
        f.write_str(&msgs.join("; "))
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        let mut set = Diagnostics::new();
        for d in iter {
            set.push(d);
        }
        set
    }
}

// ===================== TESTS =====================
