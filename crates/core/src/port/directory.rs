// Registry Ports - keyed lookup and insert for users, services, counters

use crate::domain::{Counter, CounterId, Service, ServiceId, User, UserId};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, name: &str, email: &str, role: &str) -> Result<User>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn list(&self) -> Result<Vec<User>>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn insert(
        &self,
        service_name: &str,
        entry_time: &str,
        end_time: &str,
        number_of_counters: i64,
    ) -> Result<Service>;

    async fn find_by_name(&self, service_name: &str) -> Result<Option<Service>>;

    /// Refresh the denormalized counter count on a service row
    async fn set_counter_count(&self, service_id: ServiceId, count: i64) -> Result<()>;

    async fn list(&self) -> Result<Vec<Service>>;
}

#[async_trait]
pub trait CounterRepository: Send + Sync {
    async fn insert(&self, counter_number: i64, service_id: ServiceId) -> Result<Counter>;

    async fn find_by_id(&self, id: CounterId) -> Result<Option<Counter>>;

    /// First counter registered for a service (lowest id). Deterministic but
    /// otherwise arbitrary counter selection for issuance.
    async fn first_for_service(&self, service_id: ServiceId) -> Result<Option<Counter>>;

    async fn find_by_number(
        &self,
        counter_number: i64,
        service_id: ServiceId,
    ) -> Result<Option<Counter>>;

    async fn count_for_service(&self, service_id: ServiceId) -> Result<i64>;

    async fn list(&self) -> Result<Vec<Counter>>;
}
