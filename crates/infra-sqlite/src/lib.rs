// Spot Queue Infrastructure - SQLite Adapter
// Implements: TokenRepository, TransactionalTokenRepository and the registry ports

mod connection;
mod migration;
mod registry_repository;
mod token_repository;
mod transaction;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use registry_repository::SqliteRegistry;
pub use token_repository::SqliteTokenRepository;
pub use transaction::SqliteTokenIssueTransaction;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
