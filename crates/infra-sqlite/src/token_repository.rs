// SQLite TokenRepository Implementation

use crate::SqliteTokenIssueTransaction;
use async_trait::async_trait;
use spotqueue_core::domain::{CounterId, ServiceId, Token, UserId, WorkStatus};
use spotqueue_core::error::{AppError, Result};
use spotqueue_core::port::{TokenIssueTransaction, TokenRepository, TransactionalTokenRepository};
use sqlx::SqlitePool;

// Helper to convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // Extract database-specific error code and message
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Database(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "787" | "3850" => AppError::Database(format!(
                        "Foreign key constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "5" => AppError::Database(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        _ => AppError::Database(err.to_string()),
    }
}

pub struct SqliteTokenRepository {
    pool: SqlitePool,
}

impl SqliteTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for SqliteTokenRepository {
    async fn insert(&self, token: &Token) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tokens (
                token_number, user_id, service_id, counter_id,
                queue_position, latitude, longitude, distance, duration,
                reach_out, work_status, issued_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(token.token_number)
        .bind(token.user_id)
        .bind(token.service_id)
        .bind(token.counter_id)
        .bind(token.queue_position)
        .bind(token.latitude)
        .bind(token.longitude)
        .bind(token.distance)
        .bind(token.duration)
        .bind(if token.reach_out { 1 } else { 0 })
        .bind(token.work_status.to_string())
        .bind(token.issued_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_latest_by_user(&self, user_id: UserId) -> Result<Option<Token>> {
        let row = sqlx::query_as::<_, TokenRow>(
            "SELECT * FROM tokens WHERE user_id = ? ORDER BY token_number DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_token()))
    }

    async fn update_travel_fields(&self, token: &Token) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tokens
            SET latitude = ?, longitude = ?, distance = ?, duration = ?, reach_out = ?
            WHERE token_number = ?
            "#,
        )
        .bind(token.latitude)
        .bind(token.longitude)
        .bind(token.distance)
        .bind(token.duration)
        .bind(if token.reach_out { 1 } else { 0 })
        .bind(token.token_number)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn mark_completed(&self, user_id: UserId) -> Result<()> {
        // Conditional update: completion is one-directional
        let result = sqlx::query(
            r#"
            UPDATE tokens
            SET work_status = 'COMPLETED', queue_position = 0
            WHERE user_id = ? AND work_status = 'PENDING'
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "User {} has no pending token",
                user_id
            )));
        }
        Ok(())
    }

    async fn assign_positions(&self, positions: &[(UserId, i64)]) -> Result<()> {
        // All positions update or none; a torn renumbering must never be
        // visible to readers
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        for (user_id, position) in positions {
            sqlx::query(
                r#"
                UPDATE tokens
                SET queue_position = ?
                WHERE user_id = ? AND work_status = 'PENDING'
                "#,
            )
            .bind(position)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn max_token_number(&self) -> Result<i64> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(token_number) FROM tokens")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(max.unwrap_or(0))
    }

    async fn count_for_counter(&self, service_id: ServiceId, counter_id: CounterId) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tokens WHERE service_id = ? AND counter_id = ?",
        )
        .bind(service_id)
        .bind(counter_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count)
    }

    async fn find_pending_by_users(&self, user_ids: &[UserId]) -> Result<Vec<Token>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; user_ids.len()].join(", ");
        let sql = format!(
            "SELECT * FROM tokens WHERE work_status = 'PENDING' AND user_id IN ({})",
            placeholders
        );

        let mut query = sqlx::query_as::<_, TokenRow>(&sql);
        for user_id in user_ids {
            query = query.bind(user_id);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_token()).collect())
    }
}

#[async_trait]
impl TransactionalTokenRepository for SqliteTokenRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn TokenIssueTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteTokenIssueTransaction::new(tx)))
    }
}

/// SQLite row representation of a token
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TokenRow {
    token_number: i64,
    user_id: i64,
    service_id: i64,
    counter_id: i64,
    queue_position: i64,
    latitude: f64,
    longitude: f64,
    distance: f64,
    duration: i64,
    reach_out: i64, // SQLite boolean as integer
    work_status: String,
    issued_at: i64,
}

impl TokenRow {
    pub(crate) fn into_token(self) -> Token {
        let work_status = self
            .work_status
            .parse::<WorkStatus>()
            .unwrap_or(WorkStatus::Completed);

        Token {
            token_number: self.token_number,
            user_id: self.user_id,
            service_id: self.service_id,
            counter_id: self.counter_id,
            queue_position: self.queue_position,
            latitude: self.latitude,
            longitude: self.longitude,
            distance: self.distance,
            duration: self.duration,
            reach_out: self.reach_out != 0,
            work_status,
            issued_at: self.issued_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations, SqliteRegistry};
    use spotqueue_core::port::{CounterRepository, ServiceRepository, UserRepository};

    async fn setup_test_db() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    /// Seed one user, one service, one counter; returns (user_id, service_id, counter_id)
    async fn seed_registry(pool: &SqlitePool) -> (i64, i64, i64) {
        let registry = SqliteRegistry::new(pool.clone());
        let user = UserRepository::insert(&registry, "salman", "salman@example.com", "User")
            .await
            .unwrap();
        let service = ServiceRepository::insert(&registry, "Health_Checkup", "09:00", "17:00", 1)
            .await
            .unwrap();
        let counter = CounterRepository::insert(&registry, 1, service.id)
            .await
            .unwrap();
        (user.id, service.id, counter.id)
    }

    fn token(number: i64, user_id: i64, service_id: i64, counter_id: i64, position: i64) -> Token {
        Token::new(
            number, user_id, service_id, counter_id, position, 24.84, 67.16, 5.0, 10, false, 1000,
        )
    }

    #[tokio::test]
    async fn test_insert_and_find_latest() {
        let pool = setup_test_db().await;
        let (user_id, service_id, counter_id) = seed_registry(&pool).await;
        let repo = SqliteTokenRepository::new(pool);

        repo.insert(&token(1, user_id, service_id, counter_id, 1))
            .await
            .unwrap();
        repo.insert(&token(2, user_id, service_id, counter_id, 2))
            .await
            .unwrap();

        let found = repo.find_latest_by_user(user_id).await.unwrap().unwrap();
        assert_eq!(found.token_number, 2);
        assert_eq!(found.work_status, WorkStatus::Pending);

        assert!(repo.find_latest_by_user(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_max_token_number_and_count() {
        let pool = setup_test_db().await;
        let (user_id, service_id, counter_id) = seed_registry(&pool).await;
        let repo = SqliteTokenRepository::new(pool);

        assert_eq!(repo.max_token_number().await.unwrap(), 0);
        assert_eq!(
            repo.count_for_counter(service_id, counter_id).await.unwrap(),
            0
        );

        repo.insert(&token(7, user_id, service_id, counter_id, 1))
            .await
            .unwrap();

        assert_eq!(repo.max_token_number().await.unwrap(), 7);
        assert_eq!(
            repo.count_for_counter(service_id, counter_id).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_mark_completed_is_one_directional() {
        let pool = setup_test_db().await;
        let (user_id, service_id, counter_id) = seed_registry(&pool).await;
        let repo = SqliteTokenRepository::new(pool);

        repo.insert(&token(1, user_id, service_id, counter_id, 1))
            .await
            .unwrap();

        repo.mark_completed(user_id).await.unwrap();
        let found = repo.find_latest_by_user(user_id).await.unwrap().unwrap();
        assert_eq!(found.work_status, WorkStatus::Completed);
        assert_eq!(found.queue_position, 0);

        // Second completion finds no pending token
        assert!(repo.mark_completed(user_id).await.is_err());
    }

    #[tokio::test]
    async fn test_assign_positions_bulk() {
        let pool = setup_test_db().await;
        let (user_id, service_id, counter_id) = seed_registry(&pool).await;
        let registry = SqliteRegistry::new(pool.clone());
        let other = UserRepository::insert(&registry, "aisha", "aisha@example.com", "User")
            .await
            .unwrap();
        let repo = SqliteTokenRepository::new(pool);

        repo.insert(&token(1, user_id, service_id, counter_id, 1))
            .await
            .unwrap();
        repo.insert(&token(2, other.id, service_id, counter_id, 2))
            .await
            .unwrap();

        repo.assign_positions(&[(other.id, 1), (user_id, 2)])
            .await
            .unwrap();

        let first = repo.find_latest_by_user(other.id).await.unwrap().unwrap();
        let second = repo.find_latest_by_user(user_id).await.unwrap().unwrap();
        assert_eq!(first.queue_position, 1);
        assert_eq!(second.queue_position, 2);
    }

    #[tokio::test]
    async fn test_find_pending_filters_completed() {
        let pool = setup_test_db().await;
        let (user_id, service_id, counter_id) = seed_registry(&pool).await;
        let registry = SqliteRegistry::new(pool.clone());
        let other = UserRepository::insert(&registry, "bilal", "bilal@example.com", "User")
            .await
            .unwrap();
        let repo = SqliteTokenRepository::new(pool);

        repo.insert(&token(1, user_id, service_id, counter_id, 1))
            .await
            .unwrap();
        repo.insert(&token(2, other.id, service_id, counter_id, 2))
            .await
            .unwrap();
        repo.mark_completed(user_id).await.unwrap();

        let pending = repo
            .find_pending_by_users(&[user_id, other.id])
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].user_id, other.id);
    }
}
