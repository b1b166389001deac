// Geo types and reach-out policies
//
// Two reach-out policies exist on purpose. Token issuance uses a permissive
// OR over the arrival signals; the geofence check used by location updates
// requires ALL of them. The two call sites want different strictness, so
// they are kept as distinct named policies rather than silently unified.

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Arrival thresholds: below 2 distance units / 2 minutes counts as "there"
pub const REACH_OUT_DISTANCE: f64 = 2.0;
pub const REACH_OUT_DURATION: i64 = 2;

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Range-check the pair
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(DomainError::InvalidLatitude(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(DomainError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }
}

/// Travel metrics from the estimator: distance (km or miles, as reported
/// upstream) and total duration in minutes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelEstimate {
    pub distance: f64,
    pub duration_minutes: i64,
}

impl TravelEstimate {
    pub fn new(distance: f64, duration_minutes: i64) -> Self {
        Self {
            distance,
            duration_minutes,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.distance < 0.0 {
            return Err(DomainError::InvalidDistance(self.distance));
        }
        if self.duration_minutes < 0 {
            return Err(DomainError::InvalidDuration(self.duration_minutes));
        }
        Ok(())
    }
}

/// Issuance-time reach-out: exact coordinate match OR either metric under
/// threshold. Either signal alone marks the user as arrived.
pub fn issuance_reach_out(origin: Coordinates, fixed: Coordinates, estimate: TravelEstimate) -> bool {
    origin == fixed
        || estimate.distance < REACH_OUT_DISTANCE
        || estimate.duration_minutes < REACH_OUT_DURATION
}

/// Geofence reach-out used by location updates: validates inputs, then
/// requires exact coordinate match AND both metrics under threshold.
pub fn geofence_reach_out(
    origin: Coordinates,
    fixed: Coordinates,
    estimate: TravelEstimate,
) -> Result<bool> {
    origin.validate()?;
    estimate.validate()?;
    Ok(origin == fixed
        && estimate.distance < REACH_OUT_DISTANCE
        && estimate.duration_minutes < REACH_OUT_DURATION)
}
