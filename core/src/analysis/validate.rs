use crate::prelude::RuleConfig;
use crate::records::{JumpStatus, NormalizedSample, PerformanceWindow};

/// Whether the exit altitude clears the minimum for a real competition
/// attempt (hard deck plus one full performance window). Failing this is a
/// warning, not a disqualification; the jump still scores.
pub fn is_valid_minimum_altitude(altitude_agl: f64, rules: &RuleConfig) -> bool {
    altitude_agl >= rules.breakoff_altitude + rules.performance_window_length
}

/// Whether the exit altitude stays under the FAI maximum. Failing this
/// disqualifies the jump.
pub fn is_valid_maximum_altitude(altitude_agl: f64, rules: &RuleConfig) -> bool {
    altitude_agl <= rules.max_altitude_meters
}

/// ISC speed-accuracy check: within the validation window every sample must
/// stay under the accuracy threshold. Fails closed; an empty window can
/// never validate a jump.
pub fn validate_speed_accuracy(
    samples: &[NormalizedSample],
    window: &PerformanceWindow,
    rules: &RuleConfig,
) -> JumpStatus {
    let mut worst = f64::NEG_INFINITY;
    let mut seen = false;
    for sample in samples
        .iter()
        .filter(|sample| sample.altitude_agl <= window.validation_start)
    {
        seen = true;
        worst = worst.max(sample.speed_accuracy_isc);
    }
    if seen && worst < rules.max_speed_accuracy {
        JumpStatus::Ok
    } else {
        JumpStatus::SpeedAccuracyExceedsLimit
    }
}
