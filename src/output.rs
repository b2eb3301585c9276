//! Output Formatting Module
//!
//! Terminal summaries printed around the dataset and setup-energy files.

use std::path::Path;

use crate::context::LocationContext;
use crate::dataset::OutputRecord;
use crate::energy::{ChargingWindows, SetupEnergy, integrate, irradiance_series};
use crate::engine::SunBounds;
use crate::time::{format_hms, format_minutes};

/// Format an energy density for display
pub fn format_energy(wh_per_m2: f64) -> String {
    if wh_per_m2 >= 1000.0 {
        format!("{:.2} kWh/m²", wh_per_m2 / 1000.0)
    } else {
        format!("{:.1} Wh/m²", wh_per_m2)
    }
}

/// Format irradiance for display
pub fn format_irradiance(w_per_m2: f64) -> String {
    format!("{:.0} W/m²", w_per_m2)
}

/// Format a signed UTC offset in hours as `GMT+10:30`.
pub fn format_utc_offset(hours: f64) -> String {
    let total = (hours * 60.0).round() as i64;
    let sign = if total < 0 { '-' } else { '+' };
    format!("GMT{}{:02}:{:02}", sign, total.abs() / 60, total.abs() % 60)
}

// ===================== TERMINAL OUTPUT =====================

/// Print the site, date and daylight window.
pub fn print_sun_bounds(ctx: &LocationContext, bounds: SunBounds) {
    println!("Location : lat={:.6}, lon={:.6}", ctx.latitude, ctx.longitude);
    println!("Timezone : {}", format_utc_offset(ctx.timezone_hours));
    match ctx.date() {
        Some(date) => println!("Date     : {} (day {})", date, ctx.day_of_year),
        None => println!("Date     : {} day {}", ctx.year, ctx.day_of_year),
    }
    println!(
        "Air      : {:.1}°C, {:.1} mb, {:.0} m",
        ctx.temperature_c, ctx.pressure_mb, ctx.altitude_m
    );
    println!();
    println!("Sunrise     : {}", format_minutes(bounds.sunrise));
    println!("Sunset      : {}", format_minutes(bounds.sunset));
    println!("Daylight    : {}", format_hms((bounds.daylight_minutes() * 60.0).round() as i64));
}

/// Print what the sampled day looks like once the dataset is written.
pub fn print_dataset_summary(path: &Path, records: &[OutputRecord]) {
    let series = irradiance_series(records);
    let (t0, t1) = match (series.first(), series.last()) {
        (Some(a), Some(b)) => (a.0, b.0),
        _ => (0.0, 0.0),
    };
    let peak = records.iter().max_by(|a, b| a.gndrn.total_cmp(&b.gndrn));

    println!();
    println!("=== Dataset ===");
    println!("File        : {}", path.display());
    println!("Rows        : {}", records.len());
    if let Some(peak) = peak {
        println!(
            "Peak Gndrn  : {} at {:02}:{:02}:{:02}",
            format_irradiance(peak.gndrn),
            peak.hour,
            peak.minute,
            peak.second
        );
    }
    println!("Daily Gndrn : {}", format_energy(integrate(&series, t0, t1)));
}

/// Print the setup-time table summary.
pub fn print_setup_energy(path: &Path, windows: ChargingWindows, table: &[SetupEnergy]) {
    println!();
    println!("=== Setup Time vs Energy ===");
    println!(
        "Charging    : sunrise-{} and {}-sunset",
        format_minutes(windows.morning_cutoff_hr * 60.0),
        format_minutes(windows.evening_cutoff_hr * 60.0)
    );
    println!("File        : {}", path.display());

    let Some(base) = table.first() else {
        return;
    };
    println!(
        "No setup    : {} (morning {}, evening {})",
        format_energy(base.total_wh),
        format_energy(base.morning_wh),
        format_energy(base.evening_wh)
    );
    if let Some(worst) = table.last()
        && worst.setup_min > base.setup_min
    {
        println!(
            "{:>3} min     : {} ({} lost)",
            worst.setup_min,
            format_energy(worst.total_wh),
            format_energy(energy_loss(base, worst))
        );
    }
}

/// Energy given up by `with` relative to `base`.
pub fn energy_loss(base: &SetupEnergy, with: &SetupEnergy) -> f64 {
    (base.total_wh - with.total_wh).max(0.0)
}

// ===================== TESTS =====================
