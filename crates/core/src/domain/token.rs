// Token Domain Model
//
// A token is one user's claim on a position in a service queue. Tokens are
// historical records: completion clears the queue position but never deletes
// the row.

use serde::{Deserialize, Serialize};

/// User identifier
pub type UserId = i64;

/// Service identifier
pub type ServiceId = i64;

/// Counter identifier
pub type CounterId = i64;

/// Token number (process-wide, monotonically increasing, never reused)
pub type TokenNumber = i64;

/// Work status of a queue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    Pending,
    Completed,
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkStatus::Pending => write!(f, "PENDING"),
            WorkStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for WorkStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(WorkStatus::Pending),
            "COMPLETED" => Ok(WorkStatus::Completed),
            other => Err(format!("unknown work status: {}", other)),
        }
    }
}

/// Token Entity
///
/// `queue_position` is 0 when the token is not waiting (completed), otherwise
/// the 1-based rank within its (service, counter) queue scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub token_number: TokenNumber,
    pub user_id: UserId,
    pub service_id: ServiceId,
    pub counter_id: CounterId,

    pub queue_position: i64,

    pub latitude: f64,
    pub longitude: f64,
    pub distance: f64,
    pub duration: i64, // minutes

    pub reach_out: bool,
    pub work_status: WorkStatus,

    pub issued_at: i64, // epoch ms (injected, not system time)
}

impl Token {
    /// Create a new pending token
    ///
    /// # Arguments
    ///
    /// * `token_number` - Unique monotonic number (computed by the engine)
    /// * `queue_position` - 1-based position at issuance
    /// * `issued_at` - Issue timestamp in epoch ms (injected via TimeProvider)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        token_number: TokenNumber,
        user_id: UserId,
        service_id: ServiceId,
        counter_id: CounterId,
        queue_position: i64,
        latitude: f64,
        longitude: f64,
        distance: f64,
        duration: i64,
        reach_out: bool,
        issued_at: i64,
    ) -> Self {
        Self {
            token_number,
            user_id,
            service_id,
            counter_id,
            queue_position,
            latitude,
            longitude,
            distance,
            duration,
            reach_out,
            work_status: WorkStatus::Pending,
            issued_at,
        }
    }

    /// Whether the token still occupies a queue slot
    pub fn is_waiting(&self) -> bool {
        self.work_status == WorkStatus::Pending
    }

    /// Transition Pending -> Completed, clearing the queue position
    pub fn complete(&mut self) -> crate::domain::error::Result<()> {
        if self.work_status != WorkStatus::Pending {
            return Err(crate::domain::error::DomainError::InvalidStateTransition {
                from: self.work_status.to_string(),
                to: WorkStatus::Completed.to_string(),
            });
        }
        self.work_status = WorkStatus::Completed;
        self.queue_position = 0;
        Ok(())
    }

    /// Refresh last known location and travel metrics (queue position untouched)
    pub fn update_travel(
        &mut self,
        latitude: f64,
        longitude: f64,
        distance: f64,
        duration: i64,
        reach_out: bool,
    ) {
        self.latitude = latitude;
        self.longitude = longitude;
        self.distance = distance;
        self.duration = duration;
        self.reach_out = reach_out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_token() -> Token {
        Token::new(1, 10, 1, 1, 1, 24.85, 67.0, 5.0, 10, false, 1000)
    }

    #[test]
    fn test_new_token_is_pending() {
        let token = pending_token();
        assert_eq!(token.work_status, WorkStatus::Pending);
        assert!(token.is_waiting());
        assert_eq!(token.queue_position, 1);
    }

    #[test]
    fn test_complete_clears_position() {
        let mut token = pending_token();
        token.complete().unwrap();
        assert_eq!(token.work_status, WorkStatus::Completed);
        assert_eq!(token.queue_position, 0);
        assert!(!token.is_waiting());
    }

    #[test]
    fn test_complete_twice_is_invalid() {
        let mut token = pending_token();
        token.complete().unwrap();
        assert!(token.complete().is_err());
    }

    #[test]
    fn test_update_travel_keeps_position() {
        let mut token = pending_token();
        token.update_travel(24.9, 67.1, 1.5, 3, true);
        assert_eq!(token.queue_position, 1);
        assert_eq!(token.distance, 1.5);
        assert_eq!(token.duration, 3);
        assert!(token.reach_out);
    }

    #[test]
    fn test_work_status_round_trip() {
        assert_eq!("PENDING".parse::<WorkStatus>().unwrap(), WorkStatus::Pending);
        assert_eq!(
            "COMPLETED".parse::<WorkStatus>().unwrap(),
            WorkStatus::Completed
        );
        assert!("DONE".parse::<WorkStatus>().is_err());
    }
}
