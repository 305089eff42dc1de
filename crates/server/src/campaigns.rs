use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use snapactivate_agent::CampaignReportGenerator;
use snapactivate_core::domain::brand::BrandId;
use snapactivate_core::domain::campaign::{
    BookedCampaign, CampaignFilter, CampaignRecord, CampaignSetupRequest, CampaignStatus,
};
use snapactivate_core::domain::performance::CampaignReport;
use snapactivate_core::domain::support::SupportTicketRequest;
use snapactivate_core::errors::ApplicationError;
use snapactivate_db::BackendOperations;

use crate::api::{api_error, bad_request, correlation_id, ApiError};

#[derive(Clone)]
pub struct CampaignState {
    operations: BackendOperations,
    reports: CampaignReportGenerator,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignListQuery {
    pub status: Option<String>,
    pub brand_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCampaignRequest {
    pub brand_id: String,
    pub campaign: CampaignSetupRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub campaign_name: String,
    #[serde(default)]
    pub brand_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub brand_id: String,
    pub ticket: SupportTicketRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCreated {
    pub ticket_id: String,
}

pub fn router(operations: BackendOperations, reports: CampaignReportGenerator) -> Router {
    Router::new()
        .route("/api/v1/campaigns", get(list_campaigns).post(book_campaign))
        .route("/api/v1/campaigns/report", post(generate_report))
        .route("/api/v1/support/tickets", post(create_ticket))
        .with_state(CampaignState { operations, reports })
}

/// `status` accepts a comma-separated list; an unknown status is rejected.
fn parse_filter(query: CampaignListQuery, correlation_id: &str) -> Result<CampaignFilter, ApiError> {
    let mut statuses = Vec::new();
    for raw in query.status.iter().flat_map(|value| value.split(',')) {
        if raw.trim().is_empty() {
            continue;
        }
        let status = CampaignStatus::parse(raw)
            .ok_or_else(|| bad_request(format!("unknown campaign status `{raw}`"), correlation_id))?;
        statuses.push(status);
    }
    Ok(CampaignFilter { statuses, brand_id: query.brand_id.as_deref().and_then(BrandId::parse) })
}

async fn list_campaigns(
    State(state): State<CampaignState>,
    Query(query): Query<CampaignListQuery>,
) -> Result<Json<Vec<CampaignRecord>>, ApiError> {
    let correlation_id = correlation_id();
    let filter = parse_filter(query, &correlation_id)?;
    state
        .operations
        .campaigns
        .list_campaigns(&filter)
        .await
        .map(Json)
        .map_err(|error| api_error(error, &correlation_id))
}

async fn book_campaign(
    State(state): State<CampaignState>,
    Json(request): Json<BookCampaignRequest>,
) -> Result<Json<BookedCampaign>, ApiError> {
    let correlation_id = correlation_id();
    let brand_id = BrandId::parse(&request.brand_id).ok_or_else(|| {
        api_error(ApplicationError::Authentication("brandId is required".to_string()), &correlation_id)
    })?;

    let booked = state
        .operations
        .campaigns
        .book_campaign(request.campaign, &brand_id)
        .await
        .map_err(|error| api_error(error, &correlation_id))?;
    info!(
        event_name = "api.campaign.booked",
        correlation_id = %correlation_id,
        campaign_id = %booked.id.0,
        status = booked.status.as_str(),
        "campaign booked"
    );
    Ok(Json(booked))
}

async fn generate_report(
    State(state): State<CampaignState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<CampaignReport>, ApiError> {
    let correlation_id = correlation_id();
    if request.campaign_name.trim().is_empty() {
        return Err(bad_request("campaignName is required", &correlation_id));
    }

    let inputs = state
        .operations
        .performance
        .report_inputs(
            &request.campaign_name,
            request.brand_id.as_deref().and_then(BrandId::parse).as_ref(),
        )
        .await
        .map_err(|error| api_error(error, &correlation_id))?;
    state.reports.generate(&inputs).await.map(Json).map_err(|error| api_error(error, &correlation_id))
}

async fn create_ticket(
    State(state): State<CampaignState>,
    Json(request): Json<CreateTicketRequest>,
) -> Result<Json<TicketCreated>, ApiError> {
    let correlation_id = correlation_id();
    let brand_id = BrandId::parse(&request.brand_id).ok_or_else(|| {
        api_error(ApplicationError::Authentication("brandId is required".to_string()), &correlation_id)
    })?;

    let reference = state
        .operations
        .support
        .create_support_ticket(request.ticket, &brand_id)
        .await
        .map_err(|error| api_error(error, &correlation_id))?;
    info!(
        event_name = "api.support.ticket_created",
        correlation_id = %correlation_id,
        ticket = %reference.0,
        "support ticket created"
    );
    Ok(Json(TicketCreated { ticket_id: reference.0 }))
}
