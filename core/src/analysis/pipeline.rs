use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::analysis::score::{self, ScoringMethod};
use crate::analysis::{normalize, segment, validate};
use crate::flysight::ingest;
use crate::prelude::{AnalysisResult, DropZone, RuleConfig};
use crate::records::{FlySightVersion, JumpResult, JumpStatus, NormalizedSample};
use crate::telemetry::BatchMetrics;

/// Runs the full per-jump pipeline over a normalized sample sequence:
/// segmentation, window derivation, rule validation, scoring, and the
/// analysis table.
pub fn process_jump(
    samples: &[NormalizedSample],
    rules: &RuleConfig,
    method: ScoringMethod,
) -> JumpResult {
    let descent = segment::drop_non_skydive(samples);
    let Some((window, windowed)) = segment::extract_free_fall(&descent, rules) else {
        return JumpResult::WarmUp;
    };

    let accuracy = validate::validate_speed_accuracy(&windowed, &window, rules);
    if accuracy != JumpStatus::Ok {
        return JumpResult::Rejected {
            samples: windowed,
            window,
            status: accuracy,
        };
    }
    if !validate::is_valid_maximum_altitude(window.start, rules) {
        return JumpResult::Rejected {
            samples: windowed,
            window,
            status: JumpStatus::AltitudeExceedsMaximum,
        };
    }

    let status = if validate::is_valid_minimum_altitude(window.start, rules) {
        JumpStatus::Ok
    } else {
        JumpStatus::AltitudeExceedsMinimum
    };

    let (best, scores) = score::score(&windowed, rules, method);
    let table = score::analysis_table(&windowed, rules);
    let max_speed = score::max_vertical_speed(&windowed);
    JumpResult::Scored {
        samples: windowed,
        window,
        score: best,
        max_speed,
        scores,
        table,
        status,
    }
}

/// Ingests, normalizes, and processes a single track file, returning the
/// jump tag alongside the result.
pub fn process_jump_file(
    path: &Path,
    drop_zone: DropZone,
    rules: &RuleConfig,
    method: ScoringMethod,
) -> AnalysisResult<(String, JumpResult)> {
    let (records, tag) = ingest::ingest_file(path, rules)?;
    let samples = normalize::normalize(&records, drop_zone)?;
    Ok((tag, process_jump(&samples, rules, method)))
}

/// Processes every discovered track file. Failures stay per-file: a track
/// that cannot be ingested yields an `Unreadable` result under its file
/// name instead of aborting the batch. Contradictory drop-zone input still
/// fails fast, since it would poison every file the same way.
pub fn process_all_jump_files(
    files: &BTreeMap<PathBuf, FlySightVersion>,
    drop_zone: DropZone,
    rules: &RuleConfig,
    method: ScoringMethod,
    metrics: &BatchMetrics,
) -> AnalysisResult<BTreeMap<String, JumpResult>> {
    drop_zone.resolve()?;

    let mut results = BTreeMap::new();
    for (path, version) in files {
        match process_jump_file(path, drop_zone, rules, method) {
            Ok((tag, result)) => {
                metrics.record(result.status());
                results.insert(tag, result);
            }
            Err(err) => {
                warn!("{}: {err}", path.display());
                metrics.record(JumpStatus::InvalidSpeedFile);
                // same tag scheme ingestion would have produced; bare file
                // names collide across v2 flight directories
                results.insert(ingest::tag_for(path, *version), JumpResult::Unreadable);
            }
        }
    }

    let snapshot = metrics.snapshot();
    info!(
        "batch complete: {} scored, {} warm-up, {} rejected, {} unreadable",
        snapshot.scored, snapshot.warm_up, snapshot.rejected, snapshot.unreadable
    );
    Ok(results)
}
