// Queue Engine - token issuance, location refresh, completion & advance
//
// The engine owns the Queue Index and is the single writer of queue
// positions and work status. Each operation is a request-scoped unit of
// work; only index mutations are serialized.

pub mod index;
pub mod select;

mod advance;
mod issue;
mod location;

pub use advance::AdvanceOutcome;
pub use index::{QueueIndex, Scope};
pub use issue::IssueTokenRequest;
pub use location::UpdateLocationRequest;

use crate::domain::Coordinates;
use crate::port::{
    CounterRepository, ServiceRepository, TimeProvider, TokenRepository,
    TransactionalTokenRepository, TravelEstimator, UserRepository,
};
use std::sync::Arc;
use std::time::Duration;

/// Default fixed service point (shared by all services)
pub const DEFAULT_FIXED_COORDINATES: Coordinates = Coordinates {
    latitude: 24.8523464,
    longitude: 67.0078039,
};

/// Handoff delay between completing a user and ranking the remainder
pub const DEFAULT_HANDOFF_DELAY: Duration = Duration::from_secs(60);

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed service point the travel estimator measures against
    pub fixed_coordinates: Coordinates,
    /// Operational buffer before next-user selection. Blocks the completing
    /// request, never the index.
    pub handoff_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_coordinates: DEFAULT_FIXED_COORDINATES,
            handoff_delay: DEFAULT_HANDOFF_DELAY,
        }
    }
}

/// Queue Engine with injected dependencies
pub struct QueueEngine {
    pub(crate) config: EngineConfig,
    pub(crate) index: QueueIndex,
    pub(crate) tx_token_repo: Arc<dyn TransactionalTokenRepository>,
    pub(crate) token_repo: Arc<dyn TokenRepository>,
    pub(crate) user_repo: Arc<dyn UserRepository>,
    pub(crate) service_repo: Arc<dyn ServiceRepository>,
    pub(crate) counter_repo: Arc<dyn CounterRepository>,
    pub(crate) travel_estimator: Arc<dyn TravelEstimator>,
    pub(crate) time_provider: Arc<dyn TimeProvider>,
}

impl QueueEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: EngineConfig,
        tx_token_repo: Arc<dyn TransactionalTokenRepository>,
        token_repo: Arc<dyn TokenRepository>,
        user_repo: Arc<dyn UserRepository>,
        service_repo: Arc<dyn ServiceRepository>,
        counter_repo: Arc<dyn CounterRepository>,
        travel_estimator: Arc<dyn TravelEstimator>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            config,
            index: QueueIndex::new(),
            tx_token_repo,
            token_repo,
            user_repo,
            service_repo,
            counter_repo,
            travel_estimator,
            time_provider,
        }
    }
}
