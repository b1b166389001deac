// Registry Entities - users, services, counters
//
// These are the foreign collaborators the queue engine resolves identifiers
// against. Authentication lives outside this system.

use crate::domain::token::{CounterId, ServiceId, UserId};
use serde::{Deserialize, Serialize};

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Offered service, e.g. "Health_Checkup"
///
/// Entry/end times are kept as "HH:MM" strings; the engine never interprets
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub service_name: String,
    pub service_entry_time: String,
    pub service_end_time: String,
    pub number_of_counters: i64,
}

/// Physical counter serving one service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    pub id: CounterId,
    pub counter_number: i64,
    pub service_id: ServiceId,
}
