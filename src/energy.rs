//! Setup-Time Energy Analysis
//!
//! The car charges from sunrise until the morning cutoff and from the evening
//! cutoff until sunset. Deploying the concentrators eats into both windows;
//! this integrates the sampled ground irradiance to show how much energy
//! each minute of setup time costs.

use std::path::Path;

use log::info;

use crate::dataset::{OutputRecord, create_file};
use crate::error::DatasetError;

pub const DEFAULT_MORNING_CUTOFF_HR: f64 = 8.0;
pub const DEFAULT_EVENING_CUTOFF_HR: f64 = 17.0;
pub const DEFAULT_MAX_SETUP_MINUTES: u32 = 30;

/// Column names for the setup-time table.
pub const HEADER: [&str; 2] = ["Time(min)", "Energy(Wh/m^2)"];

/// Clock hours bounding the morning and evening charging windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargingWindows {
    /// Morning charging must stop by this hour
    pub morning_cutoff_hr: f64,
    /// Evening charging may start from this hour
    pub evening_cutoff_hr: f64,
}

impl Default for ChargingWindows {
    fn default() -> Self {
        Self {
            morning_cutoff_hr: DEFAULT_MORNING_CUTOFF_HR,
            evening_cutoff_hr: DEFAULT_EVENING_CUTOFF_HR,
        }
    }
}

/// Direct-normal energy collected for one setup time, in Wh/m².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetupEnergy {
    pub setup_min: u32,
    pub morning_wh: f64,
    pub evening_wh: f64,
    pub total_wh: f64,
}

// ===================== INTEGRATION =====================

/// Linear interpolation in a time-sorted series; zero outside it.
fn interpolate(series: &[(f64, f64)], t: f64) -> f64 {
    let (Some(&(t_first, _)), Some(&(t_last, y_last))) = (series.first(), series.last()) else {
        return 0.0;
    };
    if t < t_first || t > t_last {
        return 0.0;
    }

    let idx = series.partition_point(|&(x, _)| x <= t);
    if idx == 0 {
        return series[0].1;
    }
    if idx == series.len() {
        return y_last;
    }

    let (x0, y0) = series[idx - 1];
    let (x1, y1) = series[idx];
    if x1 <= x0 {
        y1
    } else {
        y0 + (y1 - y0) * (t - x0) / (x1 - x0)
    }
}

/// Trapezoidal integral of a (hours, W/m²) series over [from, to], in Wh/m².
///
/// The window is clipped to the series; an empty or reversed window is zero.
pub fn integrate(series: &[(f64, f64)], from: f64, to: f64) -> f64 {
    let (Some(&(t_first, _)), Some(&(t_last, _))) = (series.first(), series.last()) else {
        return 0.0;
    };
    let lo = from.max(t_first);
    let hi = to.min(t_last);
    if hi <= lo {
        return 0.0;
    }

    let mut points = vec![(lo, interpolate(series, lo))];
    points.extend(series.iter().copied().filter(|&(t, _)| t > lo && t < hi));
    points.push((hi, interpolate(series, hi)));

    points.windows(2).map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0).sum()
}

/// (hours since midnight, ground irradiance) pairs from the dataset rows.
pub fn irradiance_series(records: &[OutputRecord]) -> Vec<(f64, f64)> {
    records.iter().map(|r| (r.time_hr, r.gndrn)).collect()
}

/// Energy collected when `setup_min` minutes are lost at each cutoff.
pub fn energy_for_setup_time(
    series: &[(f64, f64)],
    windows: ChargingWindows,
    setup_min: u32,
) -> SetupEnergy {
    let setup_hr = f64::from(setup_min) / 60.0;
    let sunrise = series.first().map_or(0.0, |p| p.0);
    let sunset = series.last().map_or(0.0, |p| p.0);

    let morning_wh = integrate(series, sunrise, windows.morning_cutoff_hr - setup_hr);
    let evening_wh = integrate(series, windows.evening_cutoff_hr + setup_hr, sunset);

    SetupEnergy { setup_min, morning_wh, evening_wh, total_wh: morning_wh + evening_wh }
}

/// Energy for every whole-minute setup time from 0 to `max_setup_min`.
pub fn setup_time_table(
    records: &[OutputRecord],
    windows: ChargingWindows,
    max_setup_min: u32,
) -> Vec<SetupEnergy> {
    let series = irradiance_series(records);
    (0..=max_setup_min).map(|s| energy_for_setup_time(&series, windows, s)).collect()
}

/// Write the `Time(min),Energy(Wh/m^2)` table, returning the row count.
pub fn write_setup_energy(path: &Path, table: &[SetupEnergy]) -> Result<usize, DatasetError> {
    let file = create_file(path)?;
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(file);

    csv.write_record(HEADER)?;
    for row in table {
        csv.write_record([row.setup_min.to_string(), format!("{:.2}", row.total_wh)])?;
    }
    csv.flush().map_err(DatasetError::Flush)?;

    info!("Wrote {} setup times to {}", table.len(), path.display());
    Ok(table.len())
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::resolve_sun_bounds;
    use crate::context::LocationContext;
    use crate::engine::SpaEngine;
    use crate::sampler::sample_daylight;
    use std::fs;

    #[test]
    fn test_integrate_constant() {
        let series = [(6.0, 100.0), (7.0, 100.0), (8.0, 100.0)];
        assert!((integrate(&series, 6.0, 8.0) - 200.0).abs() < 1e-12);
        // Partial window interpolates at both ends
        assert!((integrate(&series, 6.25, 7.5) - 125.0).abs() < 1e-12);
    }

    #[test]
    fn test_integrate_ramp() {
        let series = [(6.0, 0.0), (7.0, 100.0)];
        assert!((integrate(&series, 6.0, 7.0) - 50.0).abs() < 1e-12);
        assert!((integrate(&series, 6.5, 7.0) - 37.5).abs() < 1e-12);
    }

    #[test]
    fn test_integrate_empty_windows() {
        let series = [(6.0, 100.0), (7.0, 100.0)];
        assert_eq!(integrate(&series, 7.0, 6.0), 0.0);
        assert_eq!(integrate(&series, 8.0, 9.0), 0.0);
        assert_eq!(integrate(&[], 6.0, 7.0), 0.0);
        // Window wider than the series is clipped
        assert!((integrate(&series, 0.0, 24.0) - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_times_add_nothing() {
        let series = [(6.0, 100.0), (6.0, 100.0), (7.0, 100.0)];
        assert!((integrate(&series, 6.0, 7.0) - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_setup_time_shrinks_both_windows() {
        let series: Vec<(f64, f64)> =
            (0..=14 * 60).map(|m| (6.0 + m as f64 / 60.0, 600.0)).collect();
        let windows = ChargingWindows::default();

        let none = energy_for_setup_time(&series, windows, 0);
        assert!((none.morning_wh - 1200.0).abs() < 1e-6);
        assert!((none.evening_wh - 1800.0).abs() < 1e-6);

        let half_hour = energy_for_setup_time(&series, windows, 30);
        assert!((half_hour.morning_wh - 900.0).abs() < 1e-6);
        assert!((half_hour.evening_wh - 1500.0).abs() < 1e-6);
        assert!((half_hour.total_wh - 2400.0).abs() < 1e-6);
    }

    #[test]
    fn test_study_table_is_non_increasing() {
        let ctx = LocationContext::coober_pedy();
        let bounds = resolve_sun_bounds(&SpaEngine, &ctx).unwrap();
        let records = sample_daylight(&SpaEngine, &ctx, bounds).unwrap();
        let windows = ChargingWindows::default();
        let table = setup_time_table(&records, windows, DEFAULT_MAX_SETUP_MINUTES);

        assert_eq!(table.len(), 31);
        assert!(table[0].morning_wh > 0.0 && table[0].evening_wh > 0.0);
        for pair in table.windows(2) {
            assert!(pair[1].total_wh <= pair[0].total_wh + 1e-9);
        }
        assert!(table[30].total_wh < table[0].total_wh);
    }

    #[test]
    fn test_write_setup_energy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energyVSetupTime.csv");
        let table = [
            SetupEnergy { setup_min: 0, morning_wh: 300.0, evening_wh: 400.126, total_wh: 700.126 },
            SetupEnergy { setup_min: 1, morning_wh: 290.0, evening_wh: 390.0, total_wh: 680.0 },
        ];
        assert_eq!(write_setup_energy(&path, &table).unwrap(), 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Time(min),Energy(Wh/m^2)\n0,700.13\n1,680.00\n"
        );
    }

    #[test]
    fn test_write_setup_energy_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("energy.csv");
        assert!(matches!(write_setup_energy(&path, &[]), Err(DatasetError::Open { .. })));
    }
}
