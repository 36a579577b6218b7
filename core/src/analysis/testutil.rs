//! Synthetic track builders shared by the analysis tests.

use crate::prelude::{FT_IN_M, MPS_TO_KMH};
use crate::records::NormalizedSample;

/// Builds one sample with the derived fields consistent with `agl` and the
/// vertical speed. Horizontal motion is held small and constant.
pub(crate) fn sample(time_unix: f64, agl: f64, v_mps: f64) -> NormalizedSample {
    sample_with_accuracy(time_unix, agl, v_mps, 0.7)
}

pub(crate) fn sample_with_accuracy(
    time_unix: f64,
    agl: f64,
    v_mps: f64,
    v_acc: f64,
) -> NormalizedSample {
    let h_mps = 3.0;
    let angle = if h_mps == 0.0 && v_mps == 0.0 {
        0.0
    } else {
        90.0 - (h_mps / v_mps).atan().to_degrees()
    };
    NormalizedSample {
        time_unix,
        altitude_msl: agl + 42.0,
        altitude_agl: agl,
        altitude_msl_ft: (agl + 42.0) * FT_IN_M,
        altitude_agl_ft: agl * FT_IN_M,
        v_mps,
        v_kmh: v_mps * MPS_TO_KMH,
        h_mps,
        h_kmh: h_mps * MPS_TO_KMH,
        speed_angle: (angle * 10.0).round() / 10.0,
        speed_accuracy: 0.4,
        speed_accuracy_isc: 2.0_f64.sqrt() * v_acc / 3.0,
        latitude: 37.8329,
        longitude: -121.6404,
    }
}

pub(crate) const BASE_TIME: f64 = 1_686_405_600.0;
pub(crate) const DT: f64 = 0.2;

/// A full synthetic flight at 5 Hz: aircraft climb, a slow roll out of the
/// door, free fall whose first past-threshold sample sits at exactly 4142 m
/// AGL, and a canopy ride separated from the free fall by a short updraft
/// blip so the run grouping is exercised.
pub(crate) fn synthetic_flight() -> Vec<NormalizedSample> {
    let mut samples = Vec::new();
    let mut t = BASE_TIME;

    // climb to altitude
    let mut alt = 100.0;
    while alt < 4205.0 {
        samples.push(sample(t, alt, -8.0));
        alt += 8.0 * DT;
        t += DT;
    }

    // leaving the door, still under the exit-speed threshold
    for v in [2.0, 6.0, 10.0, 14.0, 18.0] {
        alt -= v * DT;
        samples.push(sample(t, alt, v));
        t += DT;
    }

    // free fall; pinned so the exit sample reads exactly 4142.0 m AGL
    alt = 4142.0;
    let mut v = 22.0;
    while alt > 1500.0 {
        samples.push(sample(t, alt, v));
        v = (v + 2.0).min(88.0);
        alt -= v * DT;
        t += DT;
    }

    // deployment updraft blip splits the descending runs
    for _ in 0..3 {
        samples.push(sample(t, alt, -1.5));
        t += DT;
    }

    // canopy ride to the ground
    while alt > 10.0 {
        samples.push(sample(t, alt, 5.0));
        alt -= 5.0 * DT;
        t += DT;
    }

    samples
}

/// A track that never leaves the ground: no run qualifies as free fall.
pub(crate) fn warm_up_track() -> Vec<NormalizedSample> {
    let mut samples = Vec::new();
    let mut t = BASE_TIME;
    for step in 0..400 {
        let wiggle = if step % 2 == 0 { 0.4 } else { -0.4 };
        samples.push(sample(t, 30.0 + wiggle, wiggle));
        t += DT;
    }
    samples
}
