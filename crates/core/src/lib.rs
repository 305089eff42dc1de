pub mod config;
pub mod domain;
pub mod errors;

pub use domain::brand::{BrandId, BrandProfile, PaymentPlan, UserRole};
pub use domain::campaign::{
    BookedCampaign, CampaignFilter, CampaignId, CampaignRecord, CampaignSetupDraft,
    CampaignSetupRequest, CampaignStatus, NewCampaign,
};
pub use domain::package::{CampaignPackage, NewPackage, PackageId, PackageUpdate};
pub use domain::performance::{
    format_rand, CampaignReport, PerformanceSummary, PromoterReport, ReportInputs, SalesEntry,
};
pub use domain::promoter::{CampaignLiveStatus, CheckInStatus, PromoterAssignment, PromoterCheckIn};
pub use domain::support::{
    NewSupportTicket, SupportTicket, SupportTicketRequest, TicketId, TicketPriority,
    TicketReference, TicketStatus,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
