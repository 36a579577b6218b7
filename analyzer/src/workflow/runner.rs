use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use log::warn;
use speedcore::analysis::{
    aggregate_results, process_all_jump_files, process_jump_file, total_results, ScoringMethod,
};
use speedcore::flysight::speed_jump_files_in;
use speedcore::prelude::AnalysisError;
use speedcore::records::{AggregateTable, JumpResult, SummaryTotals};
use speedcore::telemetry::{BatchMetrics, BatchSnapshot};

use crate::workflow::config::AnalyzerConfig;

/// Everything one analyzer run produced.
pub struct BatchOutcome {
    pub results: BTreeMap<String, JumpResult>,
    /// `None` when the batch held no cleanly scored jump.
    pub aggregate: Option<AggregateTable>,
    pub totals: Option<SummaryTotals>,
    pub metrics: BatchSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: AnalyzerConfig,
}

impl Runner {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Analyzes a single track file or a whole directory tree of them.
    pub fn execute(&self, path: &Path, method: ScoringMethod) -> anyhow::Result<BatchOutcome> {
        let drop_zone = self.config.drop_zone();
        let rules = &self.config.rules;
        let metrics = BatchMetrics::new();

        let results = if path.is_dir() {
            let files = speed_jump_files_in(path, rules);
            process_all_jump_files(&files, drop_zone, rules, method, &metrics)
                .with_context(|| format!("processing jump files under {}", path.display()))?
        } else {
            let (tag, result) = process_jump_file(path, drop_zone, rules, method)
                .with_context(|| format!("processing jump file {}", path.display()))?;
            metrics.record(result.status());
            BTreeMap::from([(tag, result)])
        };

        let aggregate = match aggregate_results(&results) {
            Ok(table) => Some(table),
            Err(AnalysisError::EmptyAggregate) => {
                warn!("no cleanly scored jumps; skipping the aggregate");
                None
            }
            Err(err) => return Err(err).context("aggregating batch results"),
        };
        let totals = match &aggregate {
            Some(table) => Some(total_results(table).context("totaling batch results")?),
            None => None,
        };

        Ok(BatchOutcome {
            results,
            aggregate,
            totals,
            metrics: metrics.snapshot(),
        })
    }
}
