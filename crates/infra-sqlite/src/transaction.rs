// SQLite Transaction Implementation for token issuance

use crate::token_repository::map_sqlx_error;
use async_trait::async_trait;
use spotqueue_core::domain::{CounterId, ServiceId, Token};
use spotqueue_core::error::Result;
use spotqueue_core::port::{TokenIssueTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};

pub struct SqliteTokenIssueTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteTokenIssueTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteTokenIssueTransaction<'_> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl TokenIssueTransaction for SqliteTokenIssueTransaction<'_> {
    async fn max_token_number(&mut self) -> Result<i64> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(token_number) FROM tokens")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(max.unwrap_or(0))
    }

    async fn count_for_counter(
        &mut self,
        service_id: ServiceId,
        counter_id: CounterId,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tokens WHERE service_id = ? AND counter_id = ?",
        )
        .bind(service_id)
        .bind(counter_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count)
    }

    async fn insert(&mut self, token: &Token) -> Result<()> {
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
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
