use async_trait::async_trait;
use thiserror::Error;

use snapactivate_core::domain::brand::{BrandId, BrandProfile};
use snapactivate_core::domain::campaign::{CampaignFilter, CampaignId, CampaignRecord, NewCampaign};
use snapactivate_core::domain::package::{CampaignPackage, NewPackage, PackageId};
use snapactivate_core::domain::performance::{PromoterReport, SalesEntry};
use snapactivate_core::domain::promoter::PromoterAssignment;
use snapactivate_core::domain::support::{NewSupportTicket, SupportTicket, TicketId};

pub mod brand;
pub mod campaign;
pub mod memory;
pub mod package;
pub mod promoter;
pub mod reporting;
pub mod support;

pub use brand::SqlBrandRepository;
pub use campaign::SqlCampaignRepository;
pub use memory::{
    InMemoryBrandRepository, InMemoryCampaignReportingRepository, InMemoryCampaignRepository,
    InMemoryPackageRepository, InMemoryPromoterAssignmentRepository,
    InMemorySupportTicketRepository,
};
pub use package::SqlPackageRepository;
pub use promoter::SqlPromoterAssignmentRepository;
pub use reporting::SqlCampaignReportingRepository;
pub use support::SqlSupportTicketRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait BrandRepository: Send + Sync {
    async fn find_by_id(&self, id: &BrandId) -> Result<Option<BrandProfile>, RepositoryError>;
    async fn save(&self, brand: BrandProfile) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait CampaignRepository: Send + Sync {
    /// Persists a new campaign and returns the identifier the store assigned.
    async fn create(&self, campaign: NewCampaign) -> Result<CampaignId, RepositoryError>;
    async fn find_by_id(&self, id: &CampaignId) -> Result<Option<CampaignRecord>, RepositoryError>;
    /// Case-insensitive title match. Campaigns of `preferred_brand` rank first,
    /// then the most recently created campaign wins.
    async fn find_by_title(
        &self,
        title: &str,
        preferred_brand: Option<&BrandId>,
    ) -> Result<Option<CampaignRecord>, RepositoryError>;
    async fn list(&self, filter: &CampaignFilter) -> Result<Vec<CampaignRecord>, RepositoryError>;
}

#[async_trait]
pub trait SupportTicketRepository: Send + Sync {
    async fn create(&self, ticket: NewSupportTicket) -> Result<TicketId, RepositoryError>;
    async fn find_by_id(&self, id: &TicketId) -> Result<Option<SupportTicket>, RepositoryError>;
    async fn list_for_brand(&self, brand_id: &BrandId)
        -> Result<Vec<SupportTicket>, RepositoryError>;
}

#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<CampaignPackage>, RepositoryError>;
    async fn find_by_id(&self, id: &PackageId) -> Result<Option<CampaignPackage>, RepositoryError>;
    async fn create(&self, package: NewPackage) -> Result<CampaignPackage, RepositoryError>;
    async fn save(&self, package: CampaignPackage) -> Result<(), RepositoryError>;
    /// Returns `false` when no package had the given id.
    async fn delete(&self, id: &PackageId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait PromoterAssignmentRepository: Send + Sync {
    async fn list_for_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<PromoterAssignment>, RepositoryError>;
    async fn save(&self, assignment: PromoterAssignment) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait CampaignReportingRepository: Send + Sync {
    async fn list_sales(&self, campaign_id: &CampaignId)
        -> Result<Vec<SalesEntry>, RepositoryError>;
    async fn list_promoter_reports(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<PromoterReport>, RepositoryError>;
    async fn save_sales_entry(&self, entry: SalesEntry) -> Result<(), RepositoryError>;
    async fn save_promoter_report(&self, report: PromoterReport) -> Result<(), RepositoryError>;
}

pub(crate) fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub(crate) mod decode {
    use std::str::FromStr;

    use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
    use rust_decimal::Decimal;

    use super::RepositoryError;

    /// Fixed-width RFC 3339 text so timestamps sort lexically.
    pub fn timestamp_text(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn parse_u32(column: &str, value: i64) -> Result<u32, RepositoryError> {
        u32::try_from(value).map_err(|_| {
            RepositoryError::Decode(format!(
                "invalid value for `{column}` (expected non-negative u32): {value}"
            ))
        })
    }

    pub fn parse_timestamp(column: &str, value: String) -> Result<DateTime<Utc>, RepositoryError> {
        DateTime::parse_from_rfc3339(&value)
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .map_err(|error| {
                RepositoryError::Decode(format!(
                    "invalid timestamp in `{column}`: `{value}` ({error})"
                ))
            })
    }

    pub fn parse_optional_timestamp(
        column: &str,
        value: Option<String>,
    ) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        value.map(|timestamp| parse_timestamp(column, timestamp)).transpose()
    }

    pub fn parse_date(column: &str, value: String) -> Result<NaiveDate, RepositoryError> {
        NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|error| {
            RepositoryError::Decode(format!("invalid date in `{column}`: `{value}` ({error})"))
        })
    }

    pub fn parse_decimal(column: &str, value: String) -> Result<Decimal, RepositoryError> {
        Decimal::from_str(&value).map_err(|error| {
            RepositoryError::Decode(format!("invalid decimal in `{column}`: `{value}` ({error})"))
        })
    }

    pub fn unknown_value(column: &str, value: &str) -> RepositoryError {
        RepositoryError::Decode(format!("unknown value for `{column}`: `{value}`"))
    }
}
