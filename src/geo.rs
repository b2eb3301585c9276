//! Horizon Geometry Module
//!
//! Defines the geometric elevation the sun's centre must reach for
//! sunrise/sunset as seen by an observer at a given altitude.

/// WGS84 equatorial radius in meters
const A_EQUATOR: f64 = 6_378_137.0;

/// WGS84 polar radius in meters
const B_POLAR: f64 = 6_356_752.314245;

/// Geocentric Earth radius at a latitude on the WGS84 ellipsoid, in meters.
pub fn earth_radius_wgs84(lat_deg: f64) -> f64 {
    let (sin, cos) = lat_deg.to_radians().sin_cos();
    let a2 = A_EQUATOR * A_EQUATOR;
    let b2 = B_POLAR * B_POLAR;
    let numerator = (a2 * cos).powi(2) + (b2 * sin).powi(2);
    let denominator = (A_EQUATOR * cos).powi(2) + (B_POLAR * sin).powi(2);
    (numerator / denominator).sqrt()
}

/// Dip of the apparent horizon below the geometric horizon, in degrees.
///
/// Below sea level the dip is negative.
pub fn horizon_dip_deg(lat_deg: f64, altitude_m: f64) -> f64 {
    if altitude_m.abs() < 1e-5 {
        return 0.0;
    }
    let r = earth_radius_wgs84(lat_deg);
    let dip = (r / (r + altitude_m.abs())).clamp(-1.0, 1.0).acos().to_degrees();
    dip.copysign(altitude_m)
}

/// Unrefracted elevation of the sun's centre at sunrise/sunset: the
/// geometric horizon lowered by the dip. Zero at sea level.
pub fn sunrise_elevation_deg(lat_deg: f64, altitude_m: f64) -> f64 {
    -horizon_dip_deg(lat_deg, altitude_m)
}

// ===================== TESTS =====================
