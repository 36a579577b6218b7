use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use speedcore::analysis::rounded_aggregate;
use speedcore::records::{AggregateTable, JumpResult, SummaryTotals};
use speedcore::telemetry::BatchSnapshot;

use crate::workflow::runner::BatchOutcome;

/// Per-jump lines, the aggregate table, and the set totals on stdout.
pub fn print_summary(outcome: &BatchOutcome) {
    for (tag, result) in &outcome.results {
        match result {
            JumpResult::Scored {
                score, max_speed, ..
            } => println!(
                "{tag}: {} score {score:.2} km/h, max {max_speed:.2} km/h",
                result.status()
            ),
            _ => println!("{tag}: {}", result.status()),
        }
    }

    if let Some(aggregate) = &outcome.aggregate {
        let display = rounded_aggregate(aggregate);
        println!();
        println!("{:<24} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "jump", "score", "5s", "10s", "15s", "20s", "25s", "finish", "max");
        for row in &display.rows {
            let [t5, t10, t15, t20, t25] = row.tranche_speeds;
            println!(
                "{:<24} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
                row.tag, row.score, t5, t10, t15, t20, t25, row.final_time, row.max_speed
            );
        }
    }
    if let Some(totals) = &outcome.totals {
        println!();
        println!(
            "total {:.2}  mean {:.2}  std dev {:.2}  best {:.2}  max speed {:.2}",
            totals.total_score,
            totals.mean_score,
            totals.score_std_dev,
            totals.max_score,
            totals.max_speed
        );
    }
    println!(
        "files: {} scored, {} warm-up, {} rejected, {} unreadable",
        outcome.metrics.scored,
        outcome.metrics.warm_up,
        outcome.metrics.rejected,
        outcome.metrics.unreadable
    );
}

/// Writes the display-rounded aggregate table as CSV.
pub fn write_csv(aggregate: &AggregateTable, path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating report {}", path.display()))?;
    writer.write_record([
        "jump",
        "score_kmh",
        "speed_5s",
        "speed_10s",
        "speed_15s",
        "speed_20s",
        "speed_25s",
        "final_time_s",
        "max_speed_kmh",
    ])?;
    for row in &rounded_aggregate(aggregate).rows {
        let mut record = vec![row.tag.clone(), row.score.to_string()];
        record.extend(row.tranche_speeds.iter().map(f64::to_string));
        record.push(row.final_time.to_string());
        record.push(row.max_speed.to_string());
        writer.write_record(&record)?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing report {}", path.display()))?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    statuses: BTreeMap<&'a str, String>,
    metrics: &'a BatchSnapshot,
    aggregate: Option<&'a AggregateTable>,
    totals: Option<&'a SummaryTotals>,
}

/// Writes a machine-readable run report. Carries per-jump statuses and the
/// aggregate rather than full jump results; candidate score maps are keyed
/// by floats and have no JSON object form.
pub fn write_json(outcome: &BatchOutcome, path: &Path) -> anyhow::Result<()> {
    let report = JsonReport {
        statuses: outcome
            .results
            .iter()
            .map(|(tag, result)| (tag.as_str(), result.status().to_string()))
            .collect(),
        metrics: &outcome.metrics,
        aggregate: outcome.aggregate.as_ref(),
        totals: outcome.totals.as_ref(),
    };
    let file = File::create(path)
        .with_context(|| format!("creating report {}", path.display()))?;
    serde_json::to_writer_pretty(file, &report)
        .with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use speedcore::records::AggregateRow;

    fn aggregate() -> AggregateTable {
        AggregateTable {
            rows: vec![AggregateRow {
                tag: "10-30-00:v2".to_string(),
                score: 441.6149,
                tranche_speeds: [201.4, 280.9, 310.2, 320.8, 318.1],
                final_time: 25.0,
                max_speed: 455.987,
            }],
        }
    }

    #[test]
    fn csv_report_round_trips() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.csv");
        write_csv(&aggregate(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "jump");
        assert_eq!(&headers[8], "max_speed_kmh");

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "10-30-00:v2");
        assert_eq!(&rows[0][1], "441.61");
        assert_eq!(&rows[0][8], "455.99");
    }

    #[test]
    fn json_report_carries_statuses_and_totals() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let mut results = BTreeMap::new();
        results.insert("12-00-00:v2".to_string(), JumpResult::WarmUp);
        let outcome = BatchOutcome {
            results,
            aggregate: Some(aggregate()),
            totals: None,
            metrics: BatchSnapshot {
                warm_up: 1,
                ..BatchSnapshot::default()
            },
        };

        write_json(&outcome, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(value["statuses"]["12-00-00:v2"], "warm-up file");
        assert_eq!(value["metrics"]["warm_up"], 1);
        assert_eq!(value["aggregate"]["rows"][0]["tag"], "10-30-00:v2");
        assert!(value["totals"].is_null());
    }
}
