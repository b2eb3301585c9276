//! Command-Line Interface Module
//!
//! Argument parsing and validation for the concentrator setup-time study.
//! Every site option falls back to an environment variable and then to the
//! Coober Pedy study values.

use std::path::PathBuf;

use clap::Parser;

use crate::context::{
    DEFAULT_DAY_OF_YEAR, DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_PRESSURE,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEZONE, DEFAULT_YEAR,
};
use crate::dataset::DEFAULT_DATASET_PATH;
use crate::energy::{
    DEFAULT_EVENING_CUTOFF_HR, DEFAULT_MAX_SETUP_MINUTES, DEFAULT_MORNING_CUTOFF_HR,
};

// ===================== CLI =====================

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Write the dataset when non-zero
    #[arg(default_value_t = 1, allow_hyphen_values = true)]
    pub compute: i64,
    /// Dataset file to create or overwrite
    #[arg(default_value = DEFAULT_DATASET_PATH)]
    pub output: PathBuf,

    /// Observer latitude in decimal degrees (-90 to 90, south negative)
    #[arg(long, default_value_t = DEFAULT_LATITUDE, allow_hyphen_values = true, value_parser = parse_latitude, env = "CONCSETUP_LATITUDE")]
    pub latitude: f64,
    /// Observer longitude in decimal degrees (-180 to 180, west negative)
    #[arg(long, default_value_t = DEFAULT_LONGITUDE, allow_hyphen_values = true, value_parser = parse_longitude, env = "CONCSETUP_LONGITUDE")]
    pub longitude: f64,
    /// UTC offset of the local clock in hours (e.g. 10.5 for ACDT)
    #[arg(long, default_value_t = DEFAULT_TIMEZONE, allow_hyphen_values = true, value_parser = parse_timezone, env = "CONCSETUP_TIMEZONE")]
    pub timezone: f64,
    /// Observer altitude above mean sea level (meters, may be negative)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true, value_parser = parse_altitude, env = "CONCSETUP_ALTITUDE")]
    pub altitude: f64,

    /// Calendar year of the study day
    #[arg(long, default_value_t = DEFAULT_YEAR, env = "CONCSETUP_YEAR")]
    pub year: i32,
    /// Day of year (1-366)
    #[arg(long, default_value_t = DEFAULT_DAY_OF_YEAR, value_parser = parse_day_of_year, env = "CONCSETUP_DAY_OF_YEAR")]
    pub day_of_year: u32,

    /// Ambient temperature in °C for refraction correction
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE, allow_hyphen_values = true, env = "CONCSETUP_TEMPERATURE")]
    pub temperature: f64,
    /// Surface pressure in millibar for refraction and air mass
    #[arg(long, default_value_t = DEFAULT_PRESSURE, env = "CONCSETUP_PRESSURE")]
    pub pressure: f64,

    // ===================== SETUP ENERGY OPTIONS =====================
    /// Also write collected energy against setup time to this file
    #[arg(long, env = "CONCSETUP_SETUP_ENERGY")]
    pub setup_energy: Option<PathBuf>,

    /// Longest setup time to tabulate, in minutes
    #[arg(long, default_value_t = DEFAULT_MAX_SETUP_MINUTES, env = "CONCSETUP_MAX_SETUP_MINUTES")]
    pub max_setup_minutes: u32,

    /// Hour by which morning charging stops
    #[arg(long, default_value_t = DEFAULT_MORNING_CUTOFF_HR, value_parser = parse_hour, env = "CONCSETUP_MORNING_CUTOFF")]
    pub morning_cutoff: f64,

    /// Hour from which evening charging resumes
    #[arg(long, default_value_t = DEFAULT_EVENING_CUTOFF_HR, value_parser = parse_hour, env = "CONCSETUP_EVENING_CUTOFF")]
    pub evening_cutoff: f64,
}

impl Args {
    /// Whether the dataset file should be written.
    pub fn write_dataset(&self) -> bool {
        self.compute != 0
    }

    /// Whether daylight needs sampling at all.
    pub fn needs_samples(&self) -> bool {
        self.write_dataset() || self.setup_energy.is_some()
    }
}

// ===================== CLI VALUE PARSERS =====================

fn parse_latitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-90.0..=90.0).contains(&v) {
        return Err(format!("Latitude must be between -90 and 90, got {}", v));
    }
    Ok(v)
}

fn parse_longitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-180.0..=180.0).contains(&v) {
        return Err(format!("Longitude must be between -180 and 180, got {}", v));
    }
    Ok(v)
}

fn parse_timezone(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-12.0..=14.0).contains(&v) {
        return Err(format!("Time zone must be between -12 and 14 hours, got {}", v));
    }
    Ok(v)
}

fn parse_altitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-500.0..=11000.0).contains(&v) {
        return Err(format!("Altitude must be between -500 and 11000 meters, got {}", v));
    }
    Ok(v)
}

fn parse_day_of_year(s: &str) -> Result<u32, String> {
    let v: u32 = s.parse().map_err(|_| format!("Invalid integer: {}", s))?;
    if !(1..=366).contains(&v) {
        return Err(format!("Day of year must be between 1 and 366, got {}", v));
    }
    Ok(v)
}

fn parse_hour(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(0.0..=24.0).contains(&v) {
        return Err(format!("Hour must be between 0 and 24, got {}", v));
    }
    Ok(v)
}

// ===================== TESTS =====================
