use std::collections::BTreeMap;
use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::sample::NormalizedSample;

/// Competition performance window, meters AGL. Derived once per jump and
/// read-only afterward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceWindow {
    /// Exit altitude.
    pub start: f64,
    /// Scoring-window floor; never below the hard deck.
    pub end: f64,
    /// Start of the speed-accuracy validation window.
    pub validation_start: f64,
}

/// Outcome classification for a processed track file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpStatus {
    Ok,
    /// No free-fall segment in the track; the device was likely warming up.
    WarmUpFile,
    /// The file could not be parsed as a FlySight track.
    InvalidSpeedFile,
    /// Speed accuracy broke the ISC threshold inside the validation window.
    SpeedAccuracyExceedsLimit,
    /// Exit below the minimum scoring altitude; warning only, still scored.
    AltitudeExceedsMinimum,
    /// Exit above the FAI maximum; disqualifying.
    AltitudeExceedsMaximum,
}

impl fmt::Display for JumpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Ok => "OK",
            Self::WarmUpFile => "warm-up file",
            Self::InvalidSpeedFile => "invalid speed file",
            Self::SpeedAccuracyExceedsLimit => "speed accuracy exceeds limit",
            Self::AltitudeExceedsMinimum => "altitude below competition minimum",
            Self::AltitudeExceedsMaximum => "altitude exceeds maximum",
        };
        f.write_str(text)
    }
}

/// Every sliding-window evaluation for a jump, keyed by candidate score in
/// km/h with the elapsed time from exit where it was measured. Kept whole
/// because trajectory display needs the time of the best score, not just
/// its value.
pub type ScoreCandidates = BTreeMap<OrderedFloat<f64>, f64>;

/// One row of the per-jump analysis table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRow {
    /// Elapsed seconds from exit. Nominally the tranche value; the fallback
    /// row for a truncated log carries the last sample's actual time, so
    /// treat this as authoritative rather than assuming a clean 25.0.
    pub time: f64,
    pub v_kmh: f64,
    pub h_kmh: f64,
    pub speed_angle: f64,
    /// Ground track distance from the exit point, meters.
    pub distance_from_exit: f64,
    pub altitude_agl_ft: f64,
    /// Combined horizontal/vertical speed vector magnitude, km/h.
    pub net_vector_kmh: f64,
}

/// Speed/angle/altitude tabulated at the fixed 5-second tranches from exit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTable {
    pub rows: Vec<AnalysisRow>,
}

impl AnalysisTable {
    /// Elapsed time covered by the final row.
    pub fn final_time(&self) -> Option<f64> {
        self.rows.last().map(|row| row.time)
    }
}

/// Terminal output of the per-jump pipeline, tagged by outcome so each
/// variant carries only the fields meaningful for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JumpResult {
    /// A scorable jump. `status` is `Ok` or the minimum-altitude warning.
    Scored {
        samples: Vec<NormalizedSample>,
        window: PerformanceWindow,
        /// Best sliding-window score, km/h.
        score: f64,
        /// Maximum vertical speed recorded, km/h.
        max_speed: f64,
        scores: ScoreCandidates,
        table: AnalysisTable,
        status: JumpStatus,
    },
    /// No free-fall segment found; nothing to score.
    WarmUp,
    /// Validation failed; windowed data retained for inspection.
    Rejected {
        samples: Vec<NormalizedSample>,
        window: PerformanceWindow,
        status: JumpStatus,
    },
    /// The file could not be ingested at all.
    Unreadable,
}

impl JumpResult {
    pub fn status(&self) -> JumpStatus {
        match self {
            Self::Scored { status, .. } | Self::Rejected { status, .. } => *status,
            Self::WarmUp => JumpStatus::WarmUpFile,
            Self::Unreadable => JumpStatus::InvalidSpeedFile,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, Self::Scored { .. })
    }
}

/// One aggregate row per scored jump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub tag: String,
    pub score: f64,
    /// Vertical speeds at the 5/10/15/20/25 s tranches, km/h.
    pub tranche_speeds: [f64; 5],
    /// Elapsed time covered by the last analysis row.
    pub final_time: f64,
    pub max_speed: f64,
}

/// Competition-style summary table, one row per scored jump, sorted by tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateTable {
    pub rows: Vec<AggregateRow>,
}

/// Whole-set totals over an aggregate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
    pub total_score: f64,
    pub mean_score: f64,
    /// Sample standard deviation of the scores.
    pub score_std_dev: f64,
    pub max_score: f64,
    /// Maximum absolute vertical speed across the whole set, km/h.
    pub max_speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_status_reflects_variant() {
        assert_eq!(JumpResult::WarmUp.status(), JumpStatus::WarmUpFile);
        assert_eq!(JumpResult::Unreadable.status(), JumpStatus::InvalidSpeedFile);
    }

    #[test]
    fn final_time_comes_from_last_row() {
        let mut table = AnalysisTable::default();
        assert_eq!(table.final_time(), None);
        table.rows.push(AnalysisRow {
            time: 22.4,
            v_kmh: 410.0,
            h_kmh: 35.0,
            speed_angle: 85.1,
            distance_from_exit: 120.0,
            altitude_agl_ft: 6500.0,
            net_vector_kmh: 411.5,
        });
        assert_eq!(table.final_time(), Some(22.4));
    }
}
