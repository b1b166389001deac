// Domain Layer - Entities and pure queue policies

pub mod error;
pub mod geo;
pub mod registry;
pub mod token;

pub use error::DomainError;
pub use geo::{geofence_reach_out, issuance_reach_out, Coordinates, TravelEstimate};
pub use registry::{Counter, Service, User};
pub use token::{CounterId, ServiceId, Token, TokenNumber, UserId, WorkStatus};
