//! Daylight Sampler
//!
//! Walks the day from sunrise to sunset at one-minute resolution. The exact
//! sunrise and sunset instants are sampled as well, so the first and last
//! steps are usually shorter than a minute; that partial-minute energy is
//! what the concentrator study measures, so boundary samples are never
//! snapped to the minute grid or deduplicated.

use log::{debug, info};

use crate::context::LocationContext;
use crate::dataset::OutputRecord;
use crate::engine::{PositionEngine, SunBounds};
use crate::error::SampleError;
use crate::irradiance::{ground_irradiance, is_usable_air_mass};
use crate::time::ClockTime;

/// Sample instants in fractional minutes: sunrise, each whole minute after
/// it and strictly before sunset, then sunset.
pub fn sample_minutes(bounds: SunBounds) -> Vec<f64> {
    let first = bounds.sunrise.floor() + 1.0;
    let interior = (0u32..)
        .map(|i| first + f64::from(i))
        .take_while(|&t| t < bounds.sunset);

    std::iter::once(bounds.sunrise).chain(interior).chain(std::iter::once(bounds.sunset)).collect()
}

/// Evaluate one instant and derive the ground irradiance.
///
/// Advisory diagnostics are logged and the record is still produced.
pub fn sample_at<E: PositionEngine>(
    engine: &E,
    ctx: &LocationContext,
    minutes: f64,
) -> Result<OutputRecord, SampleError> {
    let at = ClockTime::from_minutes(minutes);
    let eval = engine.evaluate(ctx, at);
    let label = at.to_string();
    eval.diagnostics.report(&label);

    if eval.diagnostics.is_fatal() {
        return Err(SampleError { at, diagnostics: eval.diagnostics.fatal() });
    }

    let s = eval.sample;
    if s.etrn > 0.0 && !is_usable_air_mass(s.air_mass) {
        debug!("{}: air mass {} unusable, ground irradiance clamped to 0", label, s.air_mass);
    }
    let gndrn = ground_irradiance(s.etrn, s.air_mass);

    debug!("{}: elevation {:.3}°, gndrn {:.1} W/m²", label, s.elevation_refracted, gndrn);
    Ok(OutputRecord::new(at, &s, gndrn))
}

/// Sample the whole daylight window in time order.
pub fn sample_daylight<E: PositionEngine>(
    engine: &E,
    ctx: &LocationContext,
    bounds: SunBounds,
) -> Result<Vec<OutputRecord>, SampleError> {
    let minutes = sample_minutes(bounds);
    info!(
        "Sampling {} instants from {} to {}",
        minutes.len(),
        ClockTime::from_minutes(bounds.sunrise),
        ClockTime::from_minutes(bounds.sunset)
    );

    minutes.into_iter().map(|m| sample_at(engine, ctx, m)).collect()
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::resolve_sun_bounds;
    use crate::diagnostics::{Diagnostic, Diagnostics};
    use crate::engine::{Evaluation, SolarSample, SpaEngine};
    use std::cell::RefCell;

    /// Engine that remembers the clock times it was asked for.
    #[derive(Default)]
    struct Recording {
        calls: RefCell<Vec<ClockTime>>,
        codes: Vec<Diagnostic>,
    }

    impl PositionEngine for Recording {
        fn evaluate(&self, _ctx: &LocationContext, at: ClockTime) -> Evaluation {
            self.calls.borrow_mut().push(at);
            let sample = SolarSample {
                azimuth: 90.0,
                elevation_unrefracted: 10.0,
                elevation_refracted: 10.1,
                etrn: 1380.0,
                air_mass: 5.6,
            };
            let diagnostics: Diagnostics = self.codes.iter().copied().collect();
            Evaluation { sample, bounds: None, diagnostics }
        }
    }

    fn study_records() -> (SunBounds, Vec<OutputRecord>) {
        let ctx = LocationContext::coober_pedy();
        let bounds = resolve_sun_bounds(&SpaEngine, &ctx).unwrap();
        let records = sample_daylight(&SpaEngine, &ctx, bounds).unwrap();
        (bounds, records)
    }

    #[test]
    fn test_sample_minutes_boundaries() {
        let m = sample_minutes(SunBounds { sunrise: 408.6, sunset: 1183.25 });
        assert_eq!(m.first(), Some(&408.6));
        assert_eq!(m[1], 409.0);
        assert_eq!(m[m.len() - 2], 1183.0);
        assert_eq!(m.last(), Some(&1183.25));
        // 409..=1183 interior plus two boundaries
        assert_eq!(m.len(), 775 + 2);
    }

    #[test]
    fn test_sample_minutes_integer_bounds() {
        let m = sample_minutes(SunBounds { sunrise: 400.0, sunset: 403.0 });
        assert_eq!(m, vec![400.0, 401.0, 402.0, 403.0]);
    }

    #[test]
    fn test_near_integer_boundary_keeps_near_duplicate() {
        let engine = Recording::default();
        let ctx = LocationContext::coober_pedy();
        let bounds = SunBounds { sunrise: 400.99, sunset: 403.001 };
        let records = sample_daylight(&engine, &ctx, bounds).unwrap();

        let calls = engine.calls.borrow();
        assert_eq!(calls.len(), records.len());
        assert_eq!(calls[0], ClockTime::new(6, 40, 59));
        assert_eq!(calls[1], ClockTime::new(6, 41, 0));
        assert_eq!(calls[calls.len() - 2], ClockTime::new(6, 43, 0));
        assert_eq!(calls[calls.len() - 1], ClockTime::new(6, 43, 0));
    }

    #[test]
    fn test_advisories_do_not_stop_sampling() {
        let engine =
            Recording { codes: vec![Diagnostic::AirMassUnavailable], ..Default::default() };
        let ctx = LocationContext::coober_pedy();
        let records =
            sample_daylight(&engine, &ctx, SunBounds { sunrise: 400.5, sunset: 410.5 }).unwrap();
        assert_eq!(records.len(), 12);
        assert!(records.iter().all(|r| r.gndrn > 0.0));
    }

    #[test]
    fn test_fatal_sample_aborts() {
        let engine =
            Recording { codes: vec![Diagnostic::ComputationFailed], ..Default::default() };
        let ctx = LocationContext::coober_pedy();
        let err = sample_daylight(&engine, &ctx, SunBounds { sunrise: 400.5, sunset: 410.5 })
            .unwrap_err();
        assert_eq!(err.at, ClockTime::new(6, 40, 30));
        assert_eq!(engine.calls.borrow().len(), 1);
    }

    #[test]
    fn test_records_span_sunrise_to_sunset_in_order() {
        let (bounds, records) = study_records();

        let first = records.first().unwrap();
        let last = records.last().unwrap();
        assert!(bounds.sunrise - first.time_min < 1.0 / 60.0 + 1e-9);
        assert!(first.time_min <= bounds.sunrise);
        assert!(bounds.sunset - last.time_min < 1.0 / 60.0 + 1e-9);
        assert!(last.time_min <= bounds.sunset);

        for pair in records.windows(2) {
            assert!(pair[0].time_sec <= pair[1].time_sec, "{:?} then {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_interior_spacing_is_one_minute() {
        let (_, records) = study_records();
        let interior = &records[1..records.len() - 1];
        for pair in interior.windows(2) {
            assert_eq!(pair[1].time_sec - pair[0].time_sec, 60.0);
        }
        assert!(interior.iter().all(|r| r.second == 0));
    }

    #[test]
    fn test_record_count_matches_daylight() {
        let (bounds, records) = study_records();
        let expected = bounds.sunset - bounds.sunrise;
        assert!(
            (records.len() as f64 - expected).abs() <= 2.0,
            "{} records for {:.2} minutes",
            records.len(),
            expected
        );
    }

    #[test]
    fn test_boundary_samples_carry_faint_irradiance() {
        let (_, records) = study_records();
        for r in [records.first().unwrap(), records.last().unwrap()] {
            // Centre on the geometric horizon, lifted above it by refraction
            assert!(r.elev_etr.abs() < 0.02, "{:?}", r);
            assert!(r.elev_ref > r.elev_etr + 0.3, "{:?}", r);
            assert!(r.etrn > 1367.0, "{:?}", r);
            assert!(r.gndrn.is_finite() && r.gndrn > 0.0, "{:?}", r);
            assert!(r.gndrn < 100.0, "{:?}", r);
        }
        assert!(records.iter().all(|r| r.gndrn.is_finite() && r.gndrn > 0.0));
    }

    #[test]
    fn test_midday_ground_irradiance() {
        let (_, records) = study_records();
        let peak = records.iter().map(|r| r.gndrn).fold(0.0, f64::max);
        // Clear-sky DNI with a 10% diffuse allowance near AM 1.07
        assert!(peak > 950.0 && peak < 1080.0, "peak {}", peak);
    }
}
