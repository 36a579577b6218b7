use std::collections::BTreeMap;

use crate::math::stats;
use crate::prelude::{AnalysisError, AnalysisResult};
use crate::records::{AggregateRow, AggregateTable, JumpResult, JumpStatus, SummaryTotals};

/// Builds the competition summary table from a batch of results. Only jumps
/// with a clean `Ok` status contribute; warning and rejected jumps are
/// reportable individually but never enter the aggregate. A batch with
/// nothing aggregatable is an error, not an empty table.
pub fn aggregate_results(
    results: &BTreeMap<String, JumpResult>,
) -> AnalysisResult<AggregateTable> {
    let mut table = AggregateTable::default();
    for (tag, result) in results {
        let JumpResult::Scored {
            score,
            max_speed,
            table: analysis,
            status,
            ..
        } = result
        else {
            continue;
        };
        if *status != JumpStatus::Ok {
            continue;
        }

        let mut tranche_speeds = [0.0; 5];
        for (slot, row) in tranche_speeds.iter_mut().zip(&analysis.rows) {
            *slot = row.v_kmh;
        }
        table.rows.push(AggregateRow {
            tag: tag.clone(),
            score: *score,
            tranche_speeds,
            final_time: analysis.final_time().unwrap_or(0.0),
            max_speed: *max_speed,
        });
    }

    if table.rows.is_empty() {
        return Err(AnalysisError::EmptyAggregate);
    }
    Ok(table)
}

/// Display form of an aggregate table, scores and speeds rounded to 0.01.
/// Elapsed times keep full precision so a truncated-log row stays visibly
/// fractional.
pub fn rounded_aggregate(table: &AggregateTable) -> AggregateTable {
    let round2 = |value: f64| (value * 100.0).round() / 100.0;
    AggregateTable {
        rows: table
            .rows
            .iter()
            .map(|row| AggregateRow {
                tag: row.tag.clone(),
                score: round2(row.score),
                tranche_speeds: row.tranche_speeds.map(round2),
                final_time: row.final_time,
                max_speed: round2(row.max_speed),
            })
            .collect(),
    }
}

/// Whole-set totals over an aggregate table.
pub fn total_results(table: &AggregateTable) -> AnalysisResult<SummaryTotals> {
    if table.rows.is_empty() {
        return Err(AnalysisError::EmptyAggregate);
    }
    let scores: Vec<f64> = table.rows.iter().map(|row| row.score).collect();
    Ok(SummaryTotals {
        total_score: scores.iter().sum(),
        mean_score: stats::mean(&scores),
        score_std_dev: stats::std_dev(&scores),
        max_score: scores.iter().copied().fold(0.0, f64::max),
        max_speed: table
            .rows
            .iter()
            .map(|row| row.max_speed.abs())
            .fold(0.0, f64::max),
    })
}
