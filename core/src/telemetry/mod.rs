pub mod metrics;

pub use metrics::{BatchMetrics, BatchSnapshot};
