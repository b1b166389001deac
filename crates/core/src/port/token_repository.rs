// Token Repository Port (Interface)

use crate::domain::{CounterId, ServiceId, Token, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Token persistence
///
/// The Queue Engine is the only writer of `queue_position` / `work_status`;
/// location updates only touch the travel fields.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Insert a new token
    async fn insert(&self, token: &Token) -> Result<()>;

    /// Most recently issued token for a user, if any
    async fn find_latest_by_user(&self, user_id: UserId) -> Result<Option<Token>>;

    /// Refresh last known location and travel metrics (queue position untouched)
    async fn update_travel_fields(&self, token: &Token) -> Result<()>;

    /// Mark a token COMPLETED and clear its queue position
    async fn mark_completed(&self, user_id: UserId) -> Result<()>;

    /// Assign queue positions in bulk; all rows update or none
    async fn assign_positions(&self, positions: &[(UserId, i64)]) -> Result<()>;

    /// Highest token number ever issued (0 when none)
    async fn max_token_number(&self) -> Result<i64>;

    /// Historical token count for a (service, counter) pair, completed
    /// tokens included. Position numbering is never reused, consistent with
    /// monotonic token numbering.
    async fn count_for_counter(&self, service_id: ServiceId, counter_id: CounterId) -> Result<i64>;

    /// Pending tokens for the given users, in no particular order
    async fn find_pending_by_users(&self, user_ids: &[UserId]) -> Result<Vec<Token>>;
}
