use log::debug;

use crate::prelude::RuleConfig;
use crate::records::{NormalizedSample, PerformanceWindow};

/// Discards everything logged before the global altitude maximum (the
/// climb, plus any pre-exit hover) along with non-positive AGL device
/// artifacts.
pub fn drop_non_skydive(samples: &[NormalizedSample]) -> Vec<NormalizedSample> {
    let mut apex_time = None;
    let mut apex_alt = f64::NEG_INFINITY;
    for sample in samples {
        if sample.altitude_agl > apex_alt {
            apex_alt = sample.altitude_agl;
            apex_time = Some(sample.time_unix);
        }
    }
    let Some(apex_time) = apex_time else {
        return Vec::new();
    };
    samples
        .iter()
        .filter(|sample| sample.time_unix > apex_time && sample.altitude_agl > 0.0)
        .cloned()
        .collect()
}

/// Maximal runs of constant vertical-speed sign.
fn sign_runs(samples: &[NormalizedSample]) -> Vec<Vec<NormalizedSample>> {
    let mut runs: Vec<Vec<NormalizedSample>> = Vec::new();
    let mut current_sign: Option<bool> = None;
    for sample in samples {
        let descending = sample.v_mps > 0.0;
        if current_sign != Some(descending) {
            runs.push(Vec::new());
            current_sign = Some(descending);
        }
        if let Some(run) = runs.last_mut() {
            run.push(sample.clone());
        }
    }
    runs
}

/// Isolates the free-fall segment and derives the performance window.
///
/// Among the constant-sign runs, the last one meeting both the minimum
/// sample count and the minimum peak speed is the free fall; canopy
/// flight, ground contact, and warm-up wiggles never meet both. Returns
/// `None` when no run qualifies, i.e. a warm-up file.
pub fn extract_free_fall(
    samples: &[NormalizedSample],
    rules: &RuleConfig,
) -> Option<(PerformanceWindow, Vec<NormalizedSample>)> {
    let free_fall = sign_runs(samples).into_iter().rev().find(|run| {
        run.len() >= rules.min_group_samples
            && run
                .iter()
                .map(|sample| sample.v_kmh)
                .fold(f64::NEG_INFINITY, f64::max)
                >= rules.min_group_peak_kmh
    })?;

    let exit_time = free_fall
        .iter()
        .find(|sample| sample.v_mps > rules.exit_speed)?
        .time_unix;

    let windowed: Vec<NormalizedSample> = free_fall
        .into_iter()
        .filter(|sample| {
            sample.time_unix >= exit_time && sample.altitude_agl >= rules.breakoff_altitude
        })
        .collect();
    let first = windowed.first()?;

    let start = first.altitude_agl;
    let end = (start - rules.performance_window_length).max(rules.breakoff_altitude);
    let window = PerformanceWindow {
        start,
        end,
        validation_start: end + rules.validation_window_length,
    };
    debug!(
        "performance window: start {:.2} end {:.2} validation {:.2}",
        window.start, window.end, window.validation_start
    );

    let windowed = windowed
        .into_iter()
        .filter(|sample| sample.altitude_agl >= end)
        .collect();
    Some((window, windowed))
}
