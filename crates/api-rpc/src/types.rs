//! RPC Request/Response Types
//!
//! Typed parameters and results per method; no dynamic payloads.

use serde::{Deserialize, Serialize};
use spotqueue_core::domain::{Counter, Service, Token, User};

/// queue.issueToken.v1 - Issue a queue token
#[derive(Debug, Deserialize)]
pub struct IssueTokenParams {
    pub email: String,
    pub service_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResult {
    pub token_number: i64,
    pub user_id: i64,
    pub service_id: i64,
    pub counter_id: i64,
    pub queue_position: i64,
    pub distance: f64,
    pub duration: i64,
    pub reach_out: bool,
    pub work_status: String,
    pub status: String,
}

impl TokenResult {
    pub fn from_token(token: Token, status: impl Into<String>) -> Self {
        Self {
            token_number: token.token_number,
            user_id: token.user_id,
            service_id: token.service_id,
            counter_id: token.counter_id,
            queue_position: token.queue_position,
            distance: token.distance,
            duration: token.duration,
            reach_out: token.reach_out,
            work_status: token.work_status.to_string(),
            status: status.into(),
        }
    }
}

/// queue.updateLocation.v1 - Refresh a user's ETA
#[derive(Debug, Deserialize)]
pub struct UpdateLocationParams {
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

/// counter.nextPerson.v1 - Complete a user and advance the queue
#[derive(Debug, Deserialize)]
pub struct NextPersonParams {
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NextPersonResult {
    pub serving: Option<i64>,
    pub message: String,
}

/// user.register.v1 - Register a user
#[derive(Debug, Deserialize)]
pub struct RegisterUserParams {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResult {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<User> for UserResult {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// service.create.v1 - Create a service
#[derive(Debug, Deserialize)]
pub struct CreateServiceParams {
    pub service_name: String,
    #[serde(default)]
    pub service_entry_time: String,
    #[serde(default)]
    pub service_end_time: String,
    pub number_of_counters: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceResult {
    pub id: i64,
    pub service_name: String,
    pub service_entry_time: String,
    pub service_end_time: String,
    pub number_of_counters: i64,
}

impl From<Service> for ServiceResult {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            service_name: service.service_name,
            service_entry_time: service.service_entry_time,
            service_end_time: service.service_end_time,
            number_of_counters: service.number_of_counters,
        }
    }
}

/// counter.create.v1 - Create a counter for a service
#[derive(Debug, Deserialize)]
pub struct CreateCounterParams {
    pub counter_number: i64,
    pub service_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CounterResult {
    pub id: i64,
    pub counter_number: i64,
    pub service_id: i64,
}

impl From<Counter> for CounterResult {
    fn from(counter: Counter) -> Self {
        Self {
            id: counter.id,
            counter_number: counter.counter_number,
            service_id: counter.service_id,
        }
    }
}
