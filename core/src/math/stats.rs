use std::collections::BTreeMap;

/// Arithmetic mean; empty input yields 0.0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); fewer than two values
/// yield 0.0.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mu = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - mu).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Most frequent consecutive delta in an ascending time series, to
/// millisecond resolution. Recovers the device sampling interval even when
/// the log has gaps.
pub fn modal_delta(times: &[f64]) -> Option<f64> {
    if times.len() < 2 {
        return None;
    }
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for pair in times.windows(2) {
        let delta_ms = ((pair[1] - pair[0]) * 1000.0).round() as i64;
        if delta_ms > 0 {
            *counts.entry(delta_ms).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(delta_ms, _)| delta_ms as f64 / 1000.0)
}
