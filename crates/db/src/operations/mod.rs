//! Backend operations the assistant tools and the HTTP API call into.
//!
//! Each operation works against injected repository trait objects so the same
//! code runs on SQLite and on the in-memory stores used in tests.

use std::sync::Arc;

use thiserror::Error;

use snapactivate_core::errors::{ApplicationError, DomainError};

use crate::repositories::{
    BrandRepository, CampaignReportingRepository, CampaignRepository, InMemoryBrandRepository,
    InMemoryCampaignReportingRepository, InMemoryCampaignRepository, InMemoryPackageRepository,
    InMemoryPromoterAssignmentRepository, InMemorySupportTicketRepository, PackageRepository,
    PromoterAssignmentRepository, RepositoryError, SqlBrandRepository,
    SqlCampaignReportingRepository, SqlCampaignRepository, SqlPackageRepository,
    SqlPromoterAssignmentRepository, SqlSupportTicketRepository, SupportTicketRepository,
};
use crate::DbPool;

pub mod campaigns;
pub mod packages;
pub mod performance;
pub mod support;

pub use campaigns::CampaignOperations;
pub use packages::PackageOperations;
pub use performance::PerformanceOperations;
pub use support::SupportOperations;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("brand `{0}` was not found")]
    BrandNotFound(String),
    #[error("campaign `{0}` was not found")]
    CampaignNotFound(String),
    #[error("package `{0}` was not found")]
    PackageNotFound(String),
    #[error("store returned no identifier for the new {0}")]
    MissingIdentifier(&'static str),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl OperationError {
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::MissingIdentifier(_) | Self::Repository(_))
    }
}

impl From<OperationError> for ApplicationError {
    fn from(value: OperationError) -> Self {
        match value {
            OperationError::BrandNotFound(id) => {
                Self::Authentication(format!("brand `{id}` is not registered"))
            }
            OperationError::CampaignNotFound(_) | OperationError::PackageNotFound(_) => {
                Self::NotFound(value.to_string())
            }
            OperationError::MissingIdentifier(_) | OperationError::Repository(_) => {
                Self::Persistence(value.to_string())
            }
            OperationError::Domain(error) => Self::Domain(error),
        }
    }
}

/// The full set of stores, shared by every operation.
#[derive(Clone)]
pub struct Stores {
    pub brands: Arc<dyn BrandRepository>,
    pub campaigns: Arc<dyn CampaignRepository>,
    pub tickets: Arc<dyn SupportTicketRepository>,
    pub packages: Arc<dyn PackageRepository>,
    pub assignments: Arc<dyn PromoterAssignmentRepository>,
    pub reporting: Arc<dyn CampaignReportingRepository>,
}

impl Stores {
    pub fn sql(pool: DbPool) -> Self {
        Self {
            brands: Arc::new(SqlBrandRepository::new(pool.clone())),
            campaigns: Arc::new(SqlCampaignRepository::new(pool.clone())),
            tickets: Arc::new(SqlSupportTicketRepository::new(pool.clone())),
            packages: Arc::new(SqlPackageRepository::new(pool.clone())),
            assignments: Arc::new(SqlPromoterAssignmentRepository::new(pool.clone())),
            reporting: Arc::new(SqlCampaignReportingRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            brands: Arc::new(InMemoryBrandRepository::default()),
            campaigns: Arc::new(InMemoryCampaignRepository::default()),
            tickets: Arc::new(InMemorySupportTicketRepository::default()),
            packages: Arc::new(InMemoryPackageRepository::default()),
            assignments: Arc::new(InMemoryPromoterAssignmentRepository::default()),
            reporting: Arc::new(InMemoryCampaignReportingRepository::default()),
        }
    }
}

#[derive(Clone)]
pub struct BackendOperations {
    pub campaigns: CampaignOperations,
    pub support: SupportOperations,
    pub performance: PerformanceOperations,
    pub packages: PackageOperations,
}

impl BackendOperations {
    pub fn new(stores: &Stores) -> Self {
        Self {
            campaigns: CampaignOperations::new(
                stores.brands.clone(),
                stores.campaigns.clone(),
                stores.assignments.clone(),
            ),
            support: SupportOperations::new(stores.tickets.clone()),
            performance: PerformanceOperations::new(
                stores.campaigns.clone(),
                stores.assignments.clone(),
                stores.reporting.clone(),
            ),
            packages: PackageOperations::new(stores.packages.clone()),
        }
    }
}
