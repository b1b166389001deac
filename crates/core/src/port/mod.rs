// Port Layer - Interfaces for external dependencies

pub mod directory;
pub mod time_provider;
pub mod token_repository;
pub mod transaction;
pub mod travel_estimator;

// Re-exports
pub use directory::{CounterRepository, ServiceRepository, UserRepository};
pub use time_provider::TimeProvider;
pub use token_repository::TokenRepository;
pub use transaction::{TokenIssueTransaction, Transaction, TransactionalTokenRepository};
pub use travel_estimator::{TravelError, TravelEstimator};
