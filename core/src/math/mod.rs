pub mod geo;
pub mod stats;

pub use geo::haversine_distance;
pub use stats::{mean, modal_delta, std_dev};
