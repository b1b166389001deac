// SQLite Registry Implementation - users, services, counters

use crate::token_repository::map_sqlx_error;
use async_trait::async_trait;
use spotqueue_core::domain::{Counter, CounterId, Service, ServiceId, User, UserId};
use spotqueue_core::error::Result;
use spotqueue_core::port::{CounterRepository, ServiceRepository, UserRepository};
use sqlx::SqlitePool;

pub struct SqliteRegistry {
    pool: SqlitePool,
}

impl SqliteRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    role: String,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            role: self.role,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: i64,
    service_name: String,
    service_entry_time: String,
    service_end_time: String,
    number_of_counters: i64,
}

impl ServiceRow {
    fn into_service(self) -> Service {
        Service {
            id: self.id,
            service_name: self.service_name,
            service_entry_time: self.service_entry_time,
            service_end_time: self.service_end_time,
            number_of_counters: self.number_of_counters,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CounterRow {
    id: i64,
    counter_number: i64,
    service_id: i64,
}

impl CounterRow {
    fn into_counter(self) -> Counter {
        Counter {
            id: self.id,
            counter_number: self.counter_number,
            service_id: self.service_id,
        }
    }
}

#[async_trait]
impl UserRepository for SqliteRegistry {
    async fn insert(&self, name: &str, email: &str, role: &str) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (name, email, role) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(name)
        .bind(email)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into_user())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_user()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_user()))
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_user()).collect())
    }
}

#[async_trait]
impl ServiceRepository for SqliteRegistry {
    async fn insert(
        &self,
        service_name: &str,
        entry_time: &str,
        end_time: &str,
        number_of_counters: i64,
    ) -> Result<Service> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r#"
            INSERT INTO services (service_name, service_entry_time, service_end_time, number_of_counters)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(service_name)
        .bind(entry_time)
        .bind(end_time)
        .bind(number_of_counters)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into_service())
    }

    async fn find_by_name(&self, service_name: &str) -> Result<Option<Service>> {
        let row =
            sqlx::query_as::<_, ServiceRow>("SELECT * FROM services WHERE service_name = ?")
                .bind(service_name)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_service()))
    }

    async fn set_counter_count(&self, service_id: ServiceId, count: i64) -> Result<()> {
        sqlx::query("UPDATE services SET number_of_counters = ? WHERE id = ?")
            .bind(count)
            .bind(service_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Service>> {
        let rows = sqlx::query_as::<_, ServiceRow>("SELECT * FROM services ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_service()).collect())
    }
}

#[async_trait]
impl CounterRepository for SqliteRegistry {
    async fn insert(&self, counter_number: i64, service_id: ServiceId) -> Result<Counter> {
        let row = sqlx::query_as::<_, CounterRow>(
            "INSERT INTO counters (counter_number, service_id) VALUES (?, ?) RETURNING *",
        )
        .bind(counter_number)
        .bind(service_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into_counter())
    }

    async fn find_by_id(&self, id: CounterId) -> Result<Option<Counter>> {
        let row = sqlx::query_as::<_, CounterRow>("SELECT * FROM counters WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_counter()))
    }

    async fn first_for_service(&self, service_id: ServiceId) -> Result<Option<Counter>> {
        // Deterministic selection: lowest counter id wins
        let row = sqlx::query_as::<_, CounterRow>(
            "SELECT * FROM counters WHERE service_id = ? ORDER BY id ASC LIMIT 1",
        )
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_counter()))
    }

    async fn find_by_number(
        &self,
        counter_number: i64,
        service_id: ServiceId,
    ) -> Result<Option<Counter>> {
        let row = sqlx::query_as::<_, CounterRow>(
            "SELECT * FROM counters WHERE counter_number = ? AND service_id = ?",
        )
        .bind(counter_number)
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_counter()))
    }

    async fn count_for_service(&self, service_id: ServiceId) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM counters WHERE service_id = ?")
            .bind(service_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }

    async fn list(&self) -> Result<Vec<Counter>> {
        let rows = sqlx::query_as::<_, CounterRow>("SELECT * FROM counters ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_counter()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn setup() -> SqliteRegistry {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteRegistry::new(pool)
    }

    #[tokio::test]
    async fn test_user_round_trip() {
        let registry = setup().await;
        let user = UserRepository::insert(&registry, "salman", "salman@example.com", "User")
            .await
            .unwrap();

        let by_email = registry
            .find_by_email("salman@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.role, "User");

        assert!(registry.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_first_counter_is_deterministic() {
        let registry = setup().await;
        let service = ServiceRepository::insert(&registry, "Health_Checkup", "09:00", "17:00", 2)
            .await
            .unwrap();

        let c1 = CounterRepository::insert(&registry, 5, service.id).await.unwrap();
        let _c2 = CounterRepository::insert(&registry, 1, service.id).await.unwrap();

        // First by id, not by counter number
        let first = registry
            .first_for_service(service.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.id, c1.id);
    }

    #[tokio::test]
    async fn test_duplicate_counter_rejected_by_schema() {
        let registry = setup().await;
        let service = ServiceRepository::insert(&registry, "Medical_Store", "09:00", "17:00", 1)
            .await
            .unwrap();

        CounterRepository::insert(&registry, 1, service.id).await.unwrap();
        let dup = CounterRepository::insert(&registry, 1, service.id).await;
        assert!(dup.is_err());
    }
}
