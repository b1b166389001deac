// Transaction port for atomic token issuance

use crate::domain::{CounterId, ServiceId, Token};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional TokenRepository operations
#[async_trait]
pub trait TransactionalTokenRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn TokenIssueTransaction>>;
}

/// Token issuance steps that must commit or roll back as one unit:
/// number allocation, position computation, and the insert itself.
#[async_trait]
pub trait TokenIssueTransaction: Transaction {
    /// Highest token number ever issued (within transaction)
    async fn max_token_number(&mut self) -> Result<i64>;

    /// Historical token count for a (service, counter) pair (within transaction)
    async fn count_for_counter(
        &mut self,
        service_id: ServiceId,
        counter_id: CounterId,
    ) -> Result<i64>;

    /// Insert token (within transaction)
    async fn insert(&mut self, token: &Token) -> Result<()>;
}
