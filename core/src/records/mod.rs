pub mod jump;
pub mod sample;

pub use jump::{
    AggregateRow, AggregateTable, AnalysisRow, AnalysisTable, JumpResult, JumpStatus,
    PerformanceWindow, ScoreCandidates, SummaryTotals,
};
pub use sample::{FlySightVersion, NormalizedSample, RawRecord};
