//! Solar-Position Engine
//!
//! Evaluates solar geometry and irradiance for a location context at a local
//! standard clock time. Positions come from the NREL SPA (`solar_positioning`);
//! sunrise and sunset are found by bisection on the unrefracted elevation
//! around solar transit.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime};
use solar_positioning::{
    Horizon, spa,
    time::DeltaT,
    types::{RefractionCorrection, SunriseResult},
};

use crate::context::LocationContext;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::geo::sunrise_elevation_deg;
use crate::irradiance::{
    AIR_MASS_UNAVAILABLE, extraterrestrial_normal, pressure_adjusted_air_mass, relative_air_mass,
};
use crate::time::ClockTime;

/// Value reported for every field the engine could not compute.
pub const SENTINEL: f64 = -999.0;

// ===================== TYPES =====================

/// Solar geometry and irradiance at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarSample {
    /// Azimuth in degrees, clockwise from north
    pub azimuth: f64,
    /// Elevation without refraction correction, in degrees
    pub elevation_unrefracted: f64,
    /// Refraction-corrected elevation, in degrees
    pub elevation_refracted: f64,
    /// Top-of-atmosphere direct-normal irradiance, W/m²
    pub etrn: f64,
    /// Pressure-adjusted relative air mass, -1 when unavailable
    pub air_mass: f64,
}

impl SolarSample {
    pub const fn unavailable() -> Self {
        Self {
            azimuth: SENTINEL,
            elevation_unrefracted: SENTINEL,
            elevation_refracted: SENTINEL,
            etrn: SENTINEL,
            air_mass: SENTINEL,
        }
    }
}

/// Sunrise and sunset in fractional minutes after local midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunBounds {
    pub sunrise: f64,
    pub sunset: f64,
}

impl SunBounds {
    /// Daylight duration in minutes.
    pub fn daylight_minutes(&self) -> f64 {
        self.sunset - self.sunrise
    }
}

/// Result of one engine call.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub sample: SolarSample,
    /// Present when sunrise/sunset were requested and both exist.
    pub bounds: Option<SunBounds>,
    pub diagnostics: Diagnostics,
}

impl Evaluation {
    fn rejected(diagnostics: Diagnostics) -> Self {
        Self { sample: SolarSample::unavailable(), bounds: None, diagnostics }
    }
}

/// Anything that can evaluate solar position for a context and clock time.
pub trait PositionEngine {
    fn evaluate(&self, ctx: &LocationContext, at: ClockTime) -> Evaluation;
}

// ===================== SPA ENGINE =====================

/// Engine backed by the NREL Solar Position Algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaEngine;

impl PositionEngine for SpaEngine {
    fn evaluate(&self, ctx: &LocationContext, at: ClockTime) -> Evaluation {
        let mut diagnostics = validate(ctx, at);
        if diagnostics.is_fatal() {
            return Evaluation::rejected(diagnostics);
        }

        let Some(calc) = SolarCalc::for_context(ctx) else {
            diagnostics.push(Diagnostic::ComputationFailed);
            return Evaluation::rejected(diagnostics);
        };

        let Some(when) = calc.local_time(at) else {
            diagnostics.push(Diagnostic::ComputationFailed);
            return Evaluation::rejected(diagnostics);
        };

        let (Some(geometric), Some(apparent)) =
            (calc.position(when, None), calc.position(when, calc.refr))
        else {
            diagnostics.push(Diagnostic::ComputationFailed);
            return Evaluation::rejected(diagnostics);
        };

        let elevation_refracted = if ctx.outputs.refraction {
            apparent.elevation_angle()
        } else {
            geometric.elevation_angle()
        };
        let zenith = 90.0 - elevation_refracted;

        let etrn = if ctx.outputs.toa_irradiance {
            extraterrestrial_normal(ctx.day_of_year, zenith)
        } else {
            0.0
        };

        let air_mass = if ctx.outputs.air_mass {
            pressure_adjusted_air_mass(relative_air_mass(zenith), ctx.pressure_mb)
        } else {
            AIR_MASS_UNAVAILABLE
        };
        if air_mass < 0.0 {
            diagnostics.push(Diagnostic::AirMassUnavailable);
        }

        let bounds = if ctx.outputs.sunrise_sunset {
            calc.sun_bounds(&mut diagnostics)
        } else {
            None
        };

        let sample = SolarSample {
            azimuth: geometric.azimuth(),
            elevation_unrefracted: geometric.elevation_angle(),
            elevation_refracted,
            etrn,
            air_mass,
        };

        Evaluation { sample, bounds, diagnostics }
    }
}

/// Range checks on the context and clock time.
fn validate(ctx: &LocationContext, at: ClockTime) -> Diagnostics {
    let mut d = Diagnostics::new();

    if DeltaT::estimate_from_date(ctx.year, 1).is_err() {
        d.push(Diagnostic::YearOutOfRange);
    }
    if ctx.date().is_none() {
        d.push(Diagnostic::DayOutOfRange);
    }
    if at.hour > 24 || (at.hour == 24 && (at.minute > 0 || at.second > 0)) {
        d.push(Diagnostic::HourOutOfRange);
    }
    if at.minute > 59 {
        d.push(Diagnostic::MinuteOutOfRange);
    }
    if at.second > 59 {
        d.push(Diagnostic::SecondOutOfRange);
    }
    if !(-12.0..=14.0).contains(&ctx.timezone_hours) || ctx.utc_offset().is_none() {
        d.push(Diagnostic::TimezoneOutOfRange);
    }
    if !(-100.0..=100.0).contains(&ctx.temperature_c) {
        d.push(Diagnostic::TemperatureOutOfRange);
    }
    if !(0.0..=2000.0).contains(&ctx.pressure_mb) {
        d.push(Diagnostic::PressureOutOfRange);
    }
    if !(-90.0..=90.0).contains(&ctx.latitude) {
        d.push(Diagnostic::LatitudeOutOfRange);
    }
    if !(-180.0..=180.0).contains(&ctx.longitude) {
        d.push(Diagnostic::LongitudeOutOfRange);
    }

    d
}

// ===================== SOLAR CALCULATION CONTEXT =====================

/// A crossing of the target elevation: local time and azimuth.
type SunEvent = (DateTime<FixedOffset>, f64);

/// Per-call calculation parameters derived from a validated context.
#[derive(Clone, Copy)]
struct SolarCalc {
    lat: f64,
    lon: f64,
    alt: f64,
    delta_t: f64,
    refr: Option<RefractionCorrection>,
    /// Unrefracted elevation of the sun's centre at sunrise/sunset
    target: f64,
    date: NaiveDate,
    offset: FixedOffset,
}

impl SolarCalc {
    fn for_context(ctx: &LocationContext) -> Option<Self> {
        let date = ctx.date()?;
        let offset = ctx.utc_offset()?;
        let delta_t = DeltaT::estimate_from_date(date.year(), date.month()).ok()?;
        let refr = RefractionCorrection::new(ctx.pressure_mb, ctx.temperature_c).ok()?;

        Some(Self {
            lat: ctx.latitude,
            lon: ctx.longitude,
            alt: ctx.altitude_m,
            delta_t,
            refr: Some(refr),
            target: sunrise_elevation_deg(ctx.latitude, ctx.altitude_m),
            date,
            offset,
        })
    }

    /// Local midnight at the start of the context date.
    fn midnight(&self) -> Option<DateTime<FixedOffset>> {
        self.date.and_time(NaiveTime::MIN).and_local_timezone(self.offset).single()
    }

    /// Absolute instant for a clock time on the context date; 24:00:00 is
    /// the following midnight.
    fn local_time(&self, at: ClockTime) -> Option<DateTime<FixedOffset>> {
        Some(self.midnight()? + Duration::seconds(at.seconds_of_day() as i64))
    }

    fn position(
        &self,
        t: DateTime<FixedOffset>,
        refr: Option<RefractionCorrection>,
    ) -> Option<solar_positioning::SolarPosition> {
        spa::solar_position(t, self.lat, self.lon, self.alt, self.delta_t, refr).ok()
    }

    /// Unrefracted elevation minus the sunrise target; NaN if SPA fails.
    ///
    /// SPA only applies refraction above its own -0.833° horizon, so the
    /// refracted curve jumps there and has no crossing near the horizon.
    fn elevation_error(&self, t: DateTime<FixedOffset>) -> f64 {
        self.position(t, None).map_or(f64::NAN, |p| p.elevation_angle() - self.target)
    }

    /// Bisect for the time the sun crosses the target elevation in [a, b].
    fn solve_root(
        &self,
        mut a: DateTime<FixedOffset>,
        mut b: DateTime<FixedOffset>,
    ) -> Option<SunEvent> {
        let mut fa = self.elevation_error(a);
        let fb = self.elevation_error(b);

        if !fa.is_finite() || !fb.is_finite() || fa.signum() == fb.signum() {
            return None;
        }

        // Half a day halves to well under a millisecond in 40 steps
        for _ in 0..40 {
            let m = a + (b - a) / 2;
            let fm = self.elevation_error(m);
            if !fm.is_finite() {
                return None;
            }
            if fm.abs() < 1e-7 {
                a = m;
                break;
            }
            if fm.signum() == fa.signum() {
                a = m;
                fa = fm;
            } else {
                b = m;
            }
        }

        let az = self.position(a, None)?.azimuth();
        Some((a, az))
    }

    /// Solar transit for the context date, anchored at local noon.
    fn transit(&self) -> Option<SunriseResult<DateTime<FixedOffset>>> {
        let noon = self.midnight()? + Duration::hours(12);
        spa::sunrise_sunset_for_horizon(
            noon,
            self.lat,
            self.lon,
            self.delta_t,
            Horizon::SunriseSunset,
        )
        .ok()
    }

    /// Sunrise and sunset events either side of transit.
    fn solve_from_noon(&self, noon: DateTime<FixedOffset>) -> (Option<SunEvent>, Option<SunEvent>) {
        let span = Duration::hours(12);
        (self.solve_root(noon - span, noon), self.solve_root(noon, noon + span))
    }

    /// Sunrise/sunset as minutes after local midnight, recording polar
    /// day or night as advisories.
    fn sun_bounds(&self, diagnostics: &mut Diagnostics) -> Option<SunBounds> {
        let Some(transit_res) = self.transit() else {
            diagnostics.push(Diagnostic::ComputationFailed);
            return None;
        };

        let transit = match transit_res {
            SunriseResult::RegularDay { transit, .. } => transit,
            SunriseResult::AllDay { .. } => {
                diagnostics.push(Diagnostic::SunNeverSets);
                return None;
            }
            SunriseResult::AllNight { .. } => {
                diagnostics.push(Diagnostic::SunNeverRises);
                return None;
            }
        };

        let (sr, ss) = self.solve_from_noon(transit);
        let (Some((sr, _)), Some((ss, _))) = (sr, ss) else {
            // SPA horizon and target elevation differ slightly; near the
            // polar circles one of the crossings can vanish.
            let noon_up = self.elevation_error(transit) > 0.0;
            let code = if noon_up { Diagnostic::SunNeverSets } else { Diagnostic::SunNeverRises };
            diagnostics.push(code);
            return None;
        };

        let midnight = self.midnight()?;
        let minutes =
            |t: DateTime<FixedOffset>| (t - midnight).num_milliseconds() as f64 / 60_000.0;
        Some(SunBounds { sunrise: minutes(sr), sunset: minutes(ss) })
    }
}

// ===================== TESTS =====================
