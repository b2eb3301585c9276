//! Location/Date Context
//!
//! Fixed observer, date and atmosphere for a single run, plus the set of
//! quantities the solar-position engine is asked to compute.

use chrono::{FixedOffset, NaiveDate};

use crate::cli::Args;

// ===================== STUDY CONSTANTS =====================

/// Coober Pedy, South Australia (29.0111° S)
pub const DEFAULT_LATITUDE: f64 = -29.0111;
/// Coober Pedy, South Australia (134.7556° E)
pub const DEFAULT_LONGITUDE: f64 = 134.7556;
/// ACDT (daylight time), GMT+10:30
pub const DEFAULT_TIMEZONE: f64 = 10.5;
pub const DEFAULT_YEAR: i32 = 2015;
/// October 20, 2015
pub const DEFAULT_DAY_OF_YEAR: u32 = 293;
/// Average temperature at 9am (°C)
pub const DEFAULT_TEMPERATURE: f64 = 20.0;
/// Standard atmospheric pressure (millibar)
pub const DEFAULT_PRESSURE: f64 = 1013.0;

// ===================== OUTPUT SELECTION =====================

/// Derived quantities requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSelection {
    /// Relative and pressure-adjusted air mass
    pub air_mass: bool,
    /// Top-of-atmosphere direct-normal irradiance
    pub toa_irradiance: bool,
    /// Refraction-corrected elevation
    pub refraction: bool,
    /// Sunrise and sunset times
    pub sunrise_sunset: bool,
}

impl OutputSelection {
    /// Everything the concentrator study needs.
    pub const fn concentrator_study() -> Self {
        Self { air_mass: true, toa_irradiance: true, refraction: true, sunrise_sunset: true }
    }
}

impl Default for OutputSelection {
    fn default() -> Self {
        Self::concentrator_study()
    }
}

/// How the engine treats the requested clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    /// Single time point, no averaging over an interval.
    #[default]
    Instantaneous,
}

// ===================== CONTEXT =====================

/// Location, date and atmosphere for a run.
///
/// Only the clock time varies between engine calls; it is passed alongside
/// the context rather than stored in it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationContext {
    /// Observer latitude in degrees (south negative)
    pub latitude: f64,
    /// Observer longitude in degrees (west negative)
    pub longitude: f64,
    /// UTC offset of the local clock in hours
    pub timezone_hours: f64,
    pub year: i32,
    /// Day of year (1-366)
    pub day_of_year: u32,
    /// Ambient temperature in °C
    pub temperature_c: f64,
    /// Surface pressure in millibar
    pub pressure_mb: f64,
    /// Observer altitude above sea level in meters
    pub altitude_m: f64,
    pub mode: EvaluationMode,
    pub outputs: OutputSelection,
}

impl LocationContext {
    /// The study site: Coober Pedy on 20 October 2015.
    pub fn coober_pedy() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            timezone_hours: DEFAULT_TIMEZONE,
            year: DEFAULT_YEAR,
            day_of_year: DEFAULT_DAY_OF_YEAR,
            temperature_c: DEFAULT_TEMPERATURE,
            pressure_mb: DEFAULT_PRESSURE,
            altitude_m: 0.0,
            mode: EvaluationMode::Instantaneous,
            outputs: OutputSelection::concentrator_study(),
        }
    }

    /// Study context with any command-line or environment overrides applied.
    pub fn from_args(args: &Args) -> Self {
        Self {
            latitude: args.latitude,
            longitude: args.longitude,
            timezone_hours: args.timezone,
            year: args.year,
            day_of_year: args.day_of_year,
            temperature_c: args.temperature,
            pressure_mb: args.pressure,
            altitude_m: args.altitude,
            ..Self::coober_pedy()
        }
    }

    /// Calendar date, if the day number exists in the year.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_yo_opt(self.year, self.day_of_year)
    }

    /// Fixed UTC offset of the local clock, rounded to the second.
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        if !self.timezone_hours.is_finite() {
            return None;
        }
        FixedOffset::east_opt((self.timezone_hours * 3600.0).round() as i32)
    }
}

// ===================== TESTS =====================
