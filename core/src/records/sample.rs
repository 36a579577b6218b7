use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// FlySight device/file format generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlySightVersion {
    V1,
    V2,
}

impl FlySightVersion {
    /// Suffix appended to human-readable jump tags.
    pub fn tag_suffix(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

/// One GNSS sample as logged by the device, after per-version column
/// handling. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub time: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    /// Altitude above mean sea level, meters.
    pub h_msl: f64,
    /// North velocity component, m/s.
    pub vel_n: f64,
    /// East velocity component, m/s.
    pub vel_e: f64,
    /// Down velocity component, m/s; positive descending.
    pub vel_d: f64,
    /// Horizontal accuracy estimate, meters.
    pub h_acc: f64,
    /// Vertical accuracy estimate, meters.
    pub v_acc: f64,
    /// Speed accuracy estimate, m/s.
    pub s_acc: f64,
    /// Satellites in view for this fix.
    pub num_sv: u32,
}

/// Analysis-ready sample in the canonical schema. A jump is an ordered
/// sequence of these, ascending by `time_unix`; the ordering is an invariant
/// the whole pipeline relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSample {
    /// Seconds since the Unix epoch, sub-second resolution preserved.
    pub time_unix: f64,
    pub altitude_msl: f64,
    /// Altitude above the drop zone, meters.
    pub altitude_agl: f64,
    pub altitude_msl_ft: f64,
    pub altitude_agl_ft: f64,
    /// Vertical speed, m/s; positive descending.
    pub v_mps: f64,
    pub v_kmh: f64,
    /// Magnitude of the north/east velocity components, m/s.
    pub h_mps: f64,
    pub h_kmh: f64,
    /// Flight-path angle in degrees from horizontal; ~90 is a vertical dive.
    pub speed_angle: f64,
    /// Raw device speed-accuracy metric (`sAcc`).
    pub speed_accuracy: f64,
    /// ISC accuracy metric: sqrt(2) * vAcc / 3.
    pub speed_accuracy_isc: f64,
    pub latitude: f64,
    pub longitude: f64,
}
