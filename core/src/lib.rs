//! Jump-analysis core for the speed-skydiving scoring platform.
//!
//! The modules follow the competition pipeline end to end: FlySight track
//! detection and ingestion, normalization into the analysis schema, free-fall
//! segmentation and performance-window derivation, ISC rule validation,
//! sliding-window scoring, and aggregation of many jumps into a competition
//! summary.

pub mod analysis;
pub mod flysight;
pub mod math;
pub mod prelude;
pub mod records;
pub mod telemetry;

pub use prelude::{AnalysisError, AnalysisResult, DropZone, RuleConfig};
