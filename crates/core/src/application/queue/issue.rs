// Token Issuance Use Case

use super::QueueEngine;
use crate::domain::{issuance_reach_out, Coordinates, Token};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Token issuance request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueTokenRequest {
    pub email: String,
    pub service_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl QueueEngine {
    /// Issue a token for a user on a named service.
    ///
    /// Resolves user, service and counter; asks the travel estimator for the
    /// user's current reach; then allocates token number and queue position
    /// inside one storage transaction. The index lock is held across the
    /// transaction so concurrent issuances cannot compute duplicate
    /// positions, and the index only gains the entry after the commit
    /// succeeds.
    pub async fn issue_token(&self, req: IssueTokenRequest) -> Result<Token> {
        let user = self
            .user_repo
            .find_by_email(&req.email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let service = self
            .service_repo
            .find_by_name(&req.service_name)
            .await?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

        let counter = self
            .counter_repo
            .first_for_service(service.id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No counter available for this service".to_string())
            })?;

        let origin = Coordinates::new(req.latitude, req.longitude);
        let estimate = self.travel_estimator.estimate(origin).await?;
        let reach_out = issuance_reach_out(origin, self.config.fixed_coordinates, estimate);

        debug!(
            user_id = user.id,
            service_id = service.id,
            counter_id = counter.id,
            distance = estimate.distance,
            duration = estimate.duration_minutes,
            reach_out,
            "Issuing token"
        );

        let scope = (service.id, counter.id);
        let mut guard = self.index.guard().await;

        let mut tx = self.tx_token_repo.begin_transaction().await?;

        let token_number = tx.max_token_number().await? + 1;
        let queue_position = tx.count_for_counter(service.id, counter.id).await? + 1;

        let token = Token::new(
            token_number,
            user.id,
            service.id,
            counter.id,
            queue_position,
            req.latitude,
            req.longitude,
            estimate.distance,
            estimate.duration_minutes,
            reach_out,
            self.time_provider.now_millis(),
        );

        tx.insert(&token).await?;
        tx.commit().await?;

        // Index gains the entry only once the token row is durable
        guard.append(scope, user.id);
        drop(guard);

        info!(
            token_number,
            user_id = user.id,
            queue_position,
            "Token issued"
        );

        Ok(token)
    }
}
