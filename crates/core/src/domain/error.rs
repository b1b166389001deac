// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid token state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid latitude: {0} (must be within [-90, 90])")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be within [-180, 180])")]
    InvalidLongitude(f64),

    #[error("Invalid travel distance: {0} (must be >= 0)")]
    InvalidDistance(f64),

    #[error("Invalid travel duration: {0} (must be >= 0)")]
    InvalidDuration(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
