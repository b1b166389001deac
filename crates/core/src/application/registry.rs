// Registry Service - user, service and counter management

use crate::domain::{Counter, CounterId, Service, User};
use crate::error::{AppError, Result};
use crate::port::{CounterRepository, ServiceRepository, UserRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

const DEFAULT_ROLE: &str = "User";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub service_name: String,
    pub service_entry_time: String,
    pub service_end_time: String,
    pub number_of_counters: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCounterRequest {
    pub counter_number: i64,
    pub service_name: String,
}

/// Registry service with injected repositories
pub struct RegistryService {
    user_repo: Arc<dyn UserRepository>,
    service_repo: Arc<dyn ServiceRepository>,
    counter_repo: Arc<dyn CounterRepository>,
}

impl RegistryService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        service_repo: Arc<dyn ServiceRepository>,
        counter_repo: Arc<dyn CounterRepository>,
    ) -> Self {
        Self {
            user_repo,
            service_repo,
            counter_repo,
        }
    }

    /// Register a new user; duplicate emails are rejected
    pub async fn register_user(&self, req: RegisterUserRequest) -> Result<User> {
        if self.user_repo.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
        let user = self
            .user_repo
            .insert(&req.name, &req.email, DEFAULT_ROLE)
            .await?;
        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Create a service; names are unique and a service must plan at least
    /// one counter
    pub async fn create_service(&self, req: CreateServiceRequest) -> Result<Service> {
        if req.number_of_counters < 1 {
            return Err(AppError::Validation(
                "A service needs at least one counter".to_string(),
            ));
        }
        if self
            .service_repo
            .find_by_name(&req.service_name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Service already exists".to_string()));
        }
        let service = self
            .service_repo
            .insert(
                &req.service_name,
                &req.service_entry_time,
                &req.service_end_time,
                req.number_of_counters,
            )
            .await?;
        info!(service_id = service.id, name = %service.service_name, "Service created");
        Ok(service)
    }

    /// Create a counter for an existing service and refresh the service's
    /// counter count
    pub async fn create_counter(&self, req: CreateCounterRequest) -> Result<Counter> {
        let service = self
            .service_repo
            .find_by_name(&req.service_name)
            .await?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

        if self
            .counter_repo
            .find_by_number(req.counter_number, service.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Counter already exists".to_string()));
        }

        let counter = self
            .counter_repo
            .insert(req.counter_number, service.id)
            .await?;

        let count = self.counter_repo.count_for_service(service.id).await?;
        self.service_repo.set_counter_count(service.id, count).await?;

        info!(
            counter_id = counter.id,
            service_id = service.id,
            "Counter created"
        );
        Ok(counter)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo.list().await
    }

    pub async fn list_services(&self) -> Result<Vec<Service>> {
        self.service_repo.list().await
    }

    pub async fn list_counters(&self) -> Result<Vec<Counter>> {
        self.counter_repo.list().await
    }

    pub async fn get_service_by_name(&self, name: &str) -> Result<Service> {
        self.service_repo
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))
    }

    pub async fn get_counter_by_id(&self, id: CounterId) -> Result<Counter> {
        self.counter_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Counter not found".to_string()))
    }
}
