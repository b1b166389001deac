// Spot Queue Infrastructure - Travel Estimator Adapter
// Implements TravelEstimator against a Distance Matrix style HTTP API

mod estimator;
mod parse;

pub use estimator::{DistanceMatrixConfig, DistanceMatrixEstimator};
pub use parse::{parse_distance_text, parse_duration_text};
