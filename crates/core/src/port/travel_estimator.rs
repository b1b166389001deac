// Travel Estimator Port
//
// Wraps the external distance-matrix service. Failures carry their own
// taxonomy so callers can tell a dead connection from a garbage payload.

use crate::domain::{Coordinates, TravelEstimate};
use async_trait::async_trait;
use thiserror::Error;

/// Travel estimator failure taxonomy
#[derive(Error, Debug)]
pub enum TravelError {
    #[error("Connection to travel estimator failed: {0}")]
    Connection(String),

    #[error("Travel estimator returned bad status: {0}")]
    BadStatus(String),

    #[error("Malformed travel estimator response: {0}")]
    MalformedResponse(String),
}

/// Estimates travel from the user's position to the fixed service point
#[async_trait]
pub trait TravelEstimator: Send + Sync {
    async fn estimate(
        &self,
        origin: Coordinates,
    ) -> std::result::Result<TravelEstimate, TravelError>;
}

/// Mock implementations for tests
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted estimator: returns queued responses, then the fallback value
    pub struct MockTravelEstimator {
        responses: Mutex<VecDeque<TravelEstimate>>,
        fallback: TravelEstimate,
    }

    impl MockTravelEstimator {
        /// Always return the same estimate
        pub fn fixed(distance: f64, duration_minutes: i64) -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                fallback: TravelEstimate::new(distance, duration_minutes),
            }
        }

        /// Return the given estimates in order, then the last one forever
        pub fn scripted(responses: Vec<TravelEstimate>) -> Self {
            let fallback = *responses.last().expect("scripted estimator needs responses");
            Self {
                responses: Mutex::new(responses.into()),
                fallback,
            }
        }
    }

    #[async_trait]
    impl TravelEstimator for MockTravelEstimator {
        async fn estimate(
            &self,
            _origin: Coordinates,
        ) -> std::result::Result<TravelEstimate, TravelError> {
            let mut responses = self.responses.lock().expect("mock estimator poisoned");
            Ok(responses.pop_front().unwrap_or(self.fallback))
        }
    }

    /// Estimator that always fails (upstream outage scenarios)
    pub struct FailingTravelEstimator;

    #[async_trait]
    impl TravelEstimator for FailingTravelEstimator {
        async fn estimate(
            &self,
            _origin: Coordinates,
        ) -> std::result::Result<TravelEstimate, TravelError> {
            Err(TravelError::Connection("mock outage".to_string()))
        }
    }
}
