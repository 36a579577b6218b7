use crate::prelude::{AnalysisResult, DropZone, FT_IN_M, MPS_TO_KMH};
use crate::records::{NormalizedSample, RawRecord};

/// Converts ingested records into the canonical analysis schema: unix time,
/// AGL/MSL altitudes in meters and feet, split horizontal/vertical speeds,
/// flight angle, and the ISC speed-accuracy metric.
///
/// Pure per-row transform plus a uniform altitude offset; no row filtering
/// happens here.
pub fn normalize(
    records: &[RawRecord],
    drop_zone: DropZone,
) -> AnalysisResult<Vec<NormalizedSample>> {
    let (dz_meters, dz_ft) = drop_zone.resolve()?;
    Ok(records
        .iter()
        .map(|record| normalize_record(record, dz_meters, dz_ft))
        .collect())
}

fn normalize_record(record: &RawRecord, dz_meters: f64, dz_ft: f64) -> NormalizedSample {
    let h_mps = (record.vel_n.powi(2) + record.vel_e.powi(2)).sqrt();
    let altitude_msl_ft = record.h_msl * FT_IN_M;
    NormalizedSample {
        time_unix: record.time.timestamp_millis() as f64 / 1000.0,
        altitude_msl: record.h_msl,
        altitude_agl: record.h_msl - dz_meters,
        altitude_msl_ft,
        altitude_agl_ft: altitude_msl_ft - dz_ft,
        v_mps: record.vel_d,
        v_kmh: record.vel_d * MPS_TO_KMH,
        h_mps,
        h_kmh: h_mps * MPS_TO_KMH,
        speed_angle: speed_angle(h_mps, record.vel_d),
        speed_accuracy: record.s_acc,
        speed_accuracy_isc: 2.0_f64.sqrt() * record.v_acc / 3.0,
        latitude: record.lat,
        longitude: record.lon,
    }
}

/// Flight-path angle in degrees from horizontal, rounded to 0.1: 0 is pure
/// horizontal flight, ~90 a vertical dive. The stationary 0/0 case pins to
/// 0.0; a lone zero vertical speed resolves through the atan limit, so no
/// NaN ever enters the pipeline.
fn speed_angle(h_mps: f64, v_mps: f64) -> f64 {
    if h_mps == 0.0 && v_mps == 0.0 {
        return 0.0;
    }
    let angle = 90.0 - (h_mps / v_mps).atan().to_degrees();
    (angle * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::AnalysisError;
    use chrono::{TimeZone, Utc};

    fn record(vel_n: f64, vel_e: f64, vel_d: f64) -> RawRecord {
        RawRecord {
            time: Utc.with_ymd_and_hms(2023, 6, 10, 14, 0, 0).unwrap(),
            lat: 37.8329,
            lon: -121.6404,
            h_msl: 4242.0,
            vel_n,
            vel_e,
            vel_d,
            h_acc: 0.5,
            v_acc: 0.9,
            s_acc: 0.4,
            num_sv: 11,
        }
    }

    #[test]
    fn derives_canonical_fields() {
        let samples = normalize(&[record(3.0, 4.0, 45.0)], DropZone::from_meters(42.0)).unwrap();
        let sample = &samples[0];

        assert_eq!(sample.altitude_msl, 4242.0);
        assert_eq!(sample.altitude_agl, 4200.0);
        assert!((sample.altitude_agl_ft - 4200.0 * FT_IN_M).abs() < 1e-9);
        assert_eq!(sample.h_mps, 5.0);
        assert_eq!(sample.v_kmh, 162.0);
        assert!((sample.speed_accuracy_isc - 2.0_f64.sqrt() * 0.9 / 3.0).abs() < 1e-12);
        // atan(5/45) = 6.34 degrees off vertical
        assert_eq!(sample.speed_angle, 83.7);
    }

    #[test]
    fn rejects_ambiguous_elevation() {
        let ambiguous = DropZone {
            elevation_meters: 42.0,
            elevation_ft: 137.79,
        };
        assert!(matches!(
            normalize(&[record(1.0, 1.0, 10.0)], ambiguous),
            Err(AnalysisError::AmbiguousElevation)
        ));
    }

    #[test]
    fn zero_vertical_speed_yields_finite_angle() {
        let samples = normalize(&[record(3.0, 4.0, 0.0)], DropZone::default()).unwrap();
        assert!(samples[0].speed_angle.is_finite());
        assert_eq!(samples[0].speed_angle, 0.0);
    }

    #[test]
    fn stationary_sample_pins_angle_to_zero() {
        let samples = normalize(&[record(0.0, 0.0, 0.0)], DropZone::default()).unwrap();
        assert_eq!(samples[0].speed_angle, 0.0);
    }

    #[test]
    fn normalization_is_idempotent() {
        let records = [record(3.0, 4.0, 45.0), record(2.0, 1.0, 50.0)];
        let first = normalize(&records, DropZone::from_meters(42.0)).unwrap();
        let second = normalize(&records, DropZone::from_meters(42.0)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn elevation_in_feet_matches_meters() {
        let records = [record(3.0, 4.0, 45.0)];
        let meters = normalize(&records, DropZone::from_meters(42.0)).unwrap();
        let feet = normalize(&records, DropZone::from_feet(42.0 * FT_IN_M)).unwrap();
        assert!((meters[0].altitude_agl - feet[0].altitude_agl).abs() < 1e-9);
    }
}
