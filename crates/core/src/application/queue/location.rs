// Location Update (ETA refresh) Use Case

use super::QueueEngine;
use crate::domain::{geofence_reach_out, Coordinates, Token, UserId};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// ETA refresh request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLocationRequest {
    pub user_id: UserId,
    pub latitude: f64,
    pub longitude: f64,
}

impl QueueEngine {
    /// Refresh a waiting user's location and travel metrics.
    ///
    /// Re-estimates travel and recomputes reach-out with the strict geofence
    /// policy. Queue membership and position are untouched.
    pub async fn update_location(&self, req: UpdateLocationRequest) -> Result<Token> {
        let mut token = self
            .token_repo
            .find_latest_by_user(req.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Token not found".to_string()))?;

        let origin = Coordinates::new(req.latitude, req.longitude);
        origin.validate()?;

        let estimate = self.travel_estimator.estimate(origin).await?;
        let reach_out = geofence_reach_out(origin, self.config.fixed_coordinates, estimate)?;

        token.update_travel(
            req.latitude,
            req.longitude,
            estimate.distance,
            estimate.duration_minutes,
            reach_out,
        );
        self.token_repo.update_travel_fields(&token).await?;

        debug!(
            user_id = req.user_id,
            distance = estimate.distance,
            duration = estimate.duration_minutes,
            reach_out,
            "Location updated"
        );

        Ok(token)
    }
}
