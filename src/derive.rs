//! Derivation of displayed values from raw samples.
//!
//! Gauges without a derive mode pass through unchanged. Everything else is
//! computed from the difference to the previous raw sample, with counter
//! resets (a decreasing counter) treated as a restart from zero.

use tracing::debug;

use crate::config::{DeriveMode, MetricSpec};

/// Per-metric state carried between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SamplerState {
    /// Last successfully resolved raw value.
    pub previous_raw: Option<f64>,
}

/// Counter delta, substituting the raw value on reset.
///
/// A negative difference means the server restarted the counter, so the
/// whole current value is what accrued since then.
pub fn counter_delta(raw: f64, previous: f64) -> f64 {
    let delta = raw - previous;
    if delta < 0.0 { raw } else { delta }
}

/// Derives the displayed value for `spec` from `raw` and updates `state`.
///
/// `tick_interval_secs` is the configured polling interval; it is fixed for
/// the lifetime of the sampler.
pub fn derive(
    spec: &MetricSpec,
    raw: f64,
    state: &mut SamplerState,
    tick_interval_secs: f64,
) -> f64 {
    let previous = state.previous_raw.replace(raw);

    if !spec.needs_history() {
        return raw;
    }

    let Some(previous) = previous else {
        return 0.0;
    };

    if raw < previous {
        debug!(
            "Counter reset on '{}': {} -> {}, using raw value as delta",
            spec.name, previous, raw
        );
    }
    let delta = counter_delta(raw, previous);

    match spec.derive {
        DeriveMode::RatePerSec => {
            if tick_interval_secs > 0.0 {
                delta / tick_interval_secs
            } else {
                0.0
            }
        }
        DeriveMode::Delta | DeriveMode::None => delta,
    }
}
