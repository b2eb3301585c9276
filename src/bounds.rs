//! Sun-Bounds Resolver
//!
//! One instantaneous engine call just after local midnight to fix the
//! sampling range for the day.

use log::info;

use crate::context::LocationContext;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::engine::{PositionEngine, SunBounds};
use crate::error::ContextError;
use crate::time::{ClockTime, MINUTES_PER_DAY, format_minutes};

/// 00:00:01, before any sunrise in the local day.
pub const RESOLVE_AT: ClockTime = ClockTime::new(0, 0, 1);

/// Resolve sunrise and sunset for the context's date.
///
/// Advisory diagnostics are logged and otherwise ignored. Fatal ones abort,
/// as does a day without both a sunrise and a sunset.
pub fn resolve_sun_bounds<E: PositionEngine>(
    engine: &E,
    ctx: &LocationContext,
) -> Result<SunBounds, ContextError> {
    info!("Getting sunrise and sunset times...");

    let eval = engine.evaluate(ctx, RESOLVE_AT);
    eval.diagnostics.report(&format!("sun bounds at {}", RESOLVE_AT));

    if eval.diagnostics.is_fatal() {
        return Err(ContextError::Fatal(eval.diagnostics.fatal()));
    }

    let Some(bounds) = eval.bounds else {
        let polar: Diagnostics = eval
            .diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::SunNeverRises | Diagnostic::SunNeverSets))
            .collect();
        return Err(ContextError::NoDaylight(polar));
    };

    let SunBounds { sunrise, sunset } = bounds;
    if !(0.0..MINUTES_PER_DAY).contains(&sunrise)
        || !(0.0..MINUTES_PER_DAY).contains(&sunset)
        || sunrise >= sunset
    {
        return Err(ContextError::OutOfDay { sunrise, sunset });
    }

    info!("Sunrise: {} ({:.4} min)", format_minutes(sunrise), sunrise);
    info!("Sunset : {} ({:.4} min)", format_minutes(sunset), sunset);

    Ok(bounds)
}

// ===================== TESTS =====================
