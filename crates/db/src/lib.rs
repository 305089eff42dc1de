pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod operations;
pub mod repositories;

pub use connection::{connect_with_config, connect_with_settings, DbPool};
pub use fixtures::{DemoSeedDataset, SeedResult, TableSeedInfo, VerificationResult};
pub use operations::{BackendOperations, OperationError, Stores};
