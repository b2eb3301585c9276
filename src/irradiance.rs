//! Irradiance Module
//!
//! Top-of-atmosphere irradiance, Kasten-Young air mass and the ground-level
//! direct-normal estimate the concentrator study integrates.

use std::f64::consts::PI;

// ===================== CONSTANTS =====================

/// Solar constant in W/m², as used by NREL SOLPOS
pub const SOLAR_CONSTANT: f64 = 1367.0;

/// Reference sea-level pressure for air mass scaling (millibar)
const REFERENCE_PRESSURE_MB: f64 = 1013.0;

/// Beyond this refracted zenith angle the air mass model is not evaluated
pub const AIR_MASS_ZENITH_LIMIT_DEG: f64 = 93.0;

/// Air mass reported when it is unavailable
pub const AIR_MASS_UNAVAILABLE: f64 = -1.0;

// ===================== TOP OF ATMOSPHERE =====================

/// Earth-Sun distance correction factor (Spencer, 1971).
pub fn earth_sun_distance_factor(day_of_year: u32) -> f64 {
    let b = 2.0 * PI * (day_of_year as f64 - 1.0) / 365.0;

    1.000110
        + 0.034221 * b.cos()
        + 0.001280 * b.sin()
        + 0.000719 * (2.0 * b).cos()
        + 0.000077 * (2.0 * b).sin()
}

/// Top-of-atmosphere direct-normal irradiance in W/m².
///
/// Zero when the refracted zenith is at or below the horizon.
pub fn extraterrestrial_normal(day_of_year: u32, refracted_zenith_deg: f64) -> f64 {
    if refracted_zenith_deg.to_radians().cos() > 0.0 {
        SOLAR_CONSTANT * earth_sun_distance_factor(day_of_year)
    } else {
        0.0
    }
}

// ===================== AIR MASS =====================

/// Relative optical air mass (Kasten & Young, 1989).
///
/// Returns [`AIR_MASS_UNAVAILABLE`] beyond [`AIR_MASS_ZENITH_LIMIT_DEG`].
pub fn relative_air_mass(refracted_zenith_deg: f64) -> f64 {
    if !refracted_zenith_deg.is_finite() || refracted_zenith_deg > AIR_MASS_ZENITH_LIMIT_DEG {
        return AIR_MASS_UNAVAILABLE;
    }
    let z = refracted_zenith_deg;
    1.0 / (z.to_radians().cos() + 0.50572 * (96.07995 - z).powf(-1.6364))
}

/// Air mass scaled to surface pressure, keeping the unavailable sentinel.
pub fn pressure_adjusted_air_mass(relative: f64, pressure_mb: f64) -> f64 {
    if relative < 0.0 {
        return AIR_MASS_UNAVAILABLE;
    }
    relative * pressure_mb / REFERENCE_PRESSURE_MB
}

// ===================== GROUND ESTIMATE =====================

/// Estimated direct-normal irradiance at the ground in W/m².
///
/// `1.1 × etrn × 0.7^(air_mass^0.678)`, the empirical clear-sky
/// attenuation from Meinel & Meinel with a 10% diffuse allowance.
///
/// A non-positive `etrn` gives exactly zero. A negative or non-finite air
/// mass (the engine's below-horizon sentinel) also gives zero, so the
/// result is always finite.
pub fn ground_irradiance(etrn: f64, air_mass: f64) -> f64 {
    if !etrn.is_finite() || etrn <= 0.0 {
        return 0.0;
    }
    if !is_usable_air_mass(air_mass) {
        return 0.0;
    }
    1.1 * etrn * 0.7_f64.powf(air_mass.powf(0.678))
}

/// Whether the air mass can be fed to [`ground_irradiance`] unclamped.
pub fn is_usable_air_mass(air_mass: f64) -> bool {
    air_mass.is_finite() && air_mass >= 0.0
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_irradiance_reference_point() {
        let g = ground_irradiance(1000.0, 1.0);
        assert!((g - 770.0).abs() < 1e-9, "got {}", g);
    }

    #[test]
    fn test_ground_irradiance_zero_without_etrn() {
        for am in [0.0, 1.0, 38.0, AIR_MASS_UNAVAILABLE, f64::NAN, f64::INFINITY] {
            assert_eq!(ground_irradiance(0.0, am), 0.0, "air mass {}", am);
        }
    }

    #[test]
    fn test_ground_irradiance_degenerate_air_mass_is_finite() {
        assert_eq!(ground_irradiance(1400.0, AIR_MASS_UNAVAILABLE), 0.0);
        assert_eq!(ground_irradiance(1400.0, f64::NAN), 0.0);
        // Very large air mass attenuates to nearly nothing but stays finite
        let g = ground_irradiance(1400.0, 1e6);
        assert!(g.is_finite() && g >= 0.0);
    }

    #[test]
    fn test_ground_irradiance_decreases_with_air_mass() {
        let overhead = ground_irradiance(1367.0, 1.0);
        let low = ground_irradiance(1367.0, 5.0);
        let horizon = ground_irradiance(1367.0, 38.0);
        assert!(overhead > low && low > horizon && horizon > 0.0);
    }

    #[test]
    fn test_distance_factor_perihelion_and_aphelion() {
        let jan3 = earth_sun_distance_factor(3);
        let jul4 = earth_sun_distance_factor(185);
        assert!(jan3 > 1.03 && jan3 < 1.04);
        assert!(jul4 > 0.96 && jul4 < 0.97);
    }

    #[test]
    fn test_extraterrestrial_normal_below_horizon() {
        assert_eq!(extraterrestrial_normal(293, 90.5), 0.0);
        let up = extraterrestrial_normal(293, 30.0);
        assert!(up > 1367.0 && up < 1400.0, "October is past perihelion side: {}", up);
    }

    #[test]
    fn test_air_mass_typical_values() {
        assert!((relative_air_mass(0.0) - 1.0).abs() < 0.01);
        let am60 = relative_air_mass(60.0);
        assert!(am60 > 1.9 && am60 < 2.1);
        let am90 = relative_air_mass(90.0);
        assert!(am90 > 30.0 && am90 < 45.0);
        assert_eq!(relative_air_mass(93.5), AIR_MASS_UNAVAILABLE);
    }

    #[test]
    fn test_pressure_adjustment() {
        let am = relative_air_mass(45.0);
        assert!((pressure_adjusted_air_mass(am, 1013.0) - am).abs() < 1e-12);
        assert!(pressure_adjusted_air_mass(am, 800.0) < am);
        assert_eq!(pressure_adjusted_air_mass(AIR_MASS_UNAVAILABLE, 1013.0), AIR_MASS_UNAVAILABLE);
    }
}
