use serde::{Deserialize, Serialize};

/// Feet in a meter, as used by the governing-body rule text.
pub const FT_IN_M: f64 = 3.2808;

/// m/s to km/h conversion factor.
pub const MPS_TO_KMH: f64 = 3.6;

/// Competition-rule constants and device-noise heuristics.
///
/// Defaults carry the current ISC/FAI/USPA figures. Every value is
/// injectable so a rule revision never means touching call sites; the
/// heuristics were tuned against FlySight noise characteristics and should
/// only change with new device data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Breakoff altitude or hard deck, meters AGL.
    pub breakoff_altitude: f64,
    /// Performance window length, meters.
    pub performance_window_length: f64,
    /// Validation window length, meters.
    pub validation_window_length: f64,
    /// Maximum ISC speed-accuracy value tolerated inside the validation
    /// window, m/s.
    pub max_speed_accuracy: f64,
    /// Maximum exit altitude AGL, meters (FAI Speed Skydiving rules 5.3).
    pub max_altitude_meters: f64,
    /// Vertical speed marking the exit, m/s; ~2g absorbs device noise.
    pub exit_speed: f64,
    /// Minimum samples for a sign-run to count as free fall.
    pub min_group_samples: usize,
    /// Minimum peak vertical speed for a sign-run to count as free fall,
    /// km/h.
    pub min_group_peak_kmh: f64,
    /// Sliding scoring interval, seconds.
    pub scoring_interval: f64,
    /// Analysis-table tranche interval, seconds.
    pub table_interval: f64,
    /// Last analysis-table tranche, seconds from exit.
    pub last_time_tranche: f64,
    /// Files below this size lack the samples for a valid speed skydive.
    pub min_jump_file_size: u64,
    /// Per-file row ceiling; parsing past it fails the file.
    pub max_rows: usize,
    /// How many leading rows of a v2 file may be device metadata.
    pub metadata_lookahead: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            breakoff_altitude: 1707.0,
            performance_window_length: 2256.0,
            validation_window_length: 1006.0,
            max_speed_accuracy: 3.0,
            max_altitude_meters: 14_000.0 / 3.28,
            exit_speed: 19.62,
            min_group_samples: 100,
            min_group_peak_kmh: 200.0,
            scoring_interval: 3.0,
            table_interval: 5.0,
            last_time_tranche: 25.0,
            min_jump_file_size: 64 * 1024,
            max_rows: 100_000,
            metadata_lookahead: 100,
        }
    }
}

/// Drop-zone elevation above MSL. Callers supply meters or feet, never
/// both; contradictory input surfaces as `AnalysisError::AmbiguousElevation`
/// when resolved.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DropZone {
    pub elevation_meters: f64,
    pub elevation_ft: f64,
}

impl DropZone {
    pub fn from_meters(elevation_meters: f64) -> Self {
        Self {
            elevation_meters,
            elevation_ft: 0.0,
        }
    }

    pub fn from_feet(elevation_ft: f64) -> Self {
        Self {
            elevation_meters: 0.0,
            elevation_ft,
        }
    }

    /// Resolves to `(meters, feet)`, rejecting contradictory input.
    pub fn resolve(&self) -> AnalysisResult<(f64, f64)> {
        if self.elevation_meters != 0.0 && self.elevation_ft != 0.0 {
            return Err(AnalysisError::AmbiguousElevation);
        }
        if self.elevation_meters != 0.0 {
            Ok((self.elevation_meters, self.elevation_meters * FT_IN_M))
        } else if self.elevation_ft != 0.0 {
            Ok((self.elevation_ft / FT_IN_M, self.elevation_ft))
        } else {
            Ok((0.0, 0.0))
        }
    }
}

/// Errors raised at stage boundaries. Expected jump outcomes (warm-up
/// files, failed validation) are `JumpStatus` values, never errors.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("drop-zone elevation set in both meters and feet; pick one")]
    AmbiguousElevation,
    #[error("invalid file format: {0}")]
    InvalidFormat(String),
    #[error("malformed log: {0}")]
    MalformedLog(String),
    #[error("no scorable jumps to aggregate")]
    EmptyAggregate,
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv failure: {0}")]
    Csv(#[from] csv::Error),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
