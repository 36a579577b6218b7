use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::math::{geo, stats};
use crate::prelude::{RuleConfig, MPS_TO_KMH};
use crate::records::{AnalysisRow, AnalysisTable, NormalizedSample, ScoreCandidates};

/// Scoring strategies. Both formulas ship because the governing-body rule
/// text (altitude drop over the scoring interval) and the descriptive
/// trailing-mean metric diverge by a fraction of a km/h on real tracks;
/// competition results use the ISC formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringMethod {
    MeanVelocity,
    #[default]
    IscAltitudeDrop,
}

/// Dispatches to the selected scoring formula.
pub fn score(
    samples: &[NormalizedSample],
    rules: &RuleConfig,
    method: ScoringMethod,
) -> (f64, ScoreCandidates) {
    match method {
        ScoringMethod::MeanVelocity => score_mean_velocity(samples, rules),
        ScoringMethod::IscAltitudeDrop => score_isc(samples, rules),
    }
}

/// Maximum trailing mean of vertical speed over the scoring interval,
/// evaluated at every sample time. Returns the best score and every
/// candidate keyed by score with its elapsed time from exit.
pub fn score_mean_velocity(
    samples: &[NormalizedSample],
    rules: &RuleConfig,
) -> (f64, ScoreCandidates) {
    let mut candidates = ScoreCandidates::new();
    let Some(first) = samples.first() else {
        return (0.0, candidates);
    };
    let base = first.time_unix;
    for sample in samples {
        let spot = sample.time_unix - base;
        let window: Vec<f64> = samples
            .iter()
            .filter(|s| {
                let elapsed = s.time_unix - base;
                elapsed <= spot && elapsed >= spot - rules.scoring_interval
            })
            .map(|s| s.v_kmh)
            .collect();
        candidates.insert(OrderedFloat(round2(stats::mean(&window))), round2(spot));
    }
    (best_of(&candidates), candidates)
}

/// Rule-formula score: the greatest altitude drop over any scoring interval,
/// converted to km/h. Candidate starts are stepped at the modal sampling
/// delta; a candidate with a missing endpoint sample (log gap) is skipped.
pub fn score_isc(samples: &[NormalizedSample], rules: &RuleConfig) -> (f64, ScoreCandidates) {
    let mut candidates = ScoreCandidates::new();
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return (0.0, candidates);
    };
    let times: Vec<f64> = samples.iter().map(|s| s.time_unix).collect();
    let Some(step) = stats::modal_delta(&times) else {
        return (0.0, candidates);
    };

    let base = first.time_unix;
    let total = last.time_unix - base;
    let tolerance = step / 2.0;
    let mut t = 0.0;
    while t + rules.scoring_interval <= total + tolerance {
        let interval_start = sample_near(samples, base + t, tolerance);
        let interval_end = sample_near(samples, base + t + rules.scoring_interval, tolerance);
        if let (Some(start), Some(end)) = (interval_start, interval_end) {
            let drop = (start.altitude_agl - end.altitude_agl).abs();
            let candidate = drop * MPS_TO_KMH / rules.scoring_interval;
            candidates.insert(OrderedFloat(round2(candidate)), round2(t));
        }
        t += step;
    }
    (best_of(&candidates), candidates)
}

/// Maximum recorded vertical speed, km/h.
pub fn max_vertical_speed(samples: &[NormalizedSample]) -> f64 {
    samples.iter().map(|s| s.v_kmh).fold(0.0, f64::max)
}

/// Speed/angle/altitude at the fixed tranches from exit. A missing tranche
/// sample probes forward in 0.1 s steps within its second; when the whole
/// probe window is past the end of the log, the last available sample
/// stands in, carrying its actual elapsed time.
pub fn analysis_table(samples: &[NormalizedSample], rules: &RuleConfig) -> AnalysisTable {
    let mut table = AnalysisTable::default();
    let Some(first) = samples.first() else {
        return table;
    };
    let base = first.time_unix;
    let origin = (first.latitude, first.longitude);

    let mut tranche = rules.table_interval;
    while tranche <= rules.last_time_tranche {
        let mut row = None;
        for tenth in 0..10 {
            let probe = tranche + tenth as f64 / 10.0;
            if let Some(sample) = sample_near(samples, base + probe, 0.05) {
                row = Some(table_row(sample, tranche, origin));
                break;
            }
        }
        let row = match row {
            Some(row) => row,
            None => {
                let fallback = &samples[samples.len() - 1];
                table_row(fallback, fallback.time_unix - base, origin)
            }
        };
        table.rows.push(row);
        tranche += rules.table_interval;
    }
    table
}

fn table_row(sample: &NormalizedSample, time: f64, origin: (f64, f64)) -> AnalysisRow {
    let distance = geo::haversine_distance(origin, (sample.latitude, sample.longitude));
    AnalysisRow {
        time,
        v_kmh: sample.v_kmh,
        h_kmh: sample.h_kmh,
        speed_angle: sample.speed_angle,
        distance_from_exit: (distance * 10.0).round() / 10.0,
        altitude_agl_ft: sample.altitude_agl_ft,
        net_vector_kmh: (sample.v_kmh.powi(2) + sample.h_kmh.powi(2)).sqrt(),
    }
}

/// Binary search for the sample closest to `target` within `tolerance`.
fn sample_near(
    samples: &[NormalizedSample],
    target: f64,
    tolerance: f64,
) -> Option<&NormalizedSample> {
    let split = samples.partition_point(|s| s.time_unix < target);
    let mut best: Option<&NormalizedSample> = None;
    for index in [split.checked_sub(1), Some(split)].into_iter().flatten() {
        if let Some(sample) = samples.get(index) {
            let offset = (sample.time_unix - target).abs();
            if offset <= tolerance
                && best.map_or(true, |b| offset < (b.time_unix - target).abs())
            {
                best = Some(sample);
            }
        }
    }
    best
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn best_of(candidates: &ScoreCandidates) -> f64 {
    candidates
        .keys()
        .next_back()
        .map(|key| key.into_inner())
        .unwrap_or(0.0)
}
