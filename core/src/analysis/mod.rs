pub mod aggregate;
pub mod normalize;
pub mod pipeline;
pub mod score;
pub mod segment;
pub mod validate;

#[cfg(test)]
pub(crate) mod testutil;

pub use aggregate::{aggregate_results, rounded_aggregate, total_results};
pub use normalize::normalize;
pub use pipeline::{process_all_jump_files, process_jump, process_jump_file};
pub use score::{analysis_table, max_vertical_speed, score, score_isc, score_mean_velocity, ScoringMethod};
pub use segment::{drop_non_skydive, extract_free_fall};
pub use validate::{is_valid_maximum_altitude, is_valid_minimum_altitude, validate_speed_accuracy};
