// Application Layer - Use Cases and Business Logic

pub mod queue;
pub mod registry;

// Re-exports
pub use queue::{AdvanceOutcome, EngineConfig, IssueTokenRequest, QueueEngine, UpdateLocationRequest};
pub use registry::RegistryService;
