use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::info;

use snapactivate_core::domain::package::{CampaignPackage, NewPackage, PackageId, PackageUpdate};
use snapactivate_db::operations::PackageOperations;

use crate::api::{api_error, bad_request, correlation_id, ApiError};

pub fn router(packages: PackageOperations) -> Router {
    Router::new()
        .route("/api/v1/packages", get(list_packages).post(create_package))
        .route("/api/v1/packages/{id}", put(update_package).delete(delete_package))
        .with_state(packages)
}

async fn list_packages(
    State(packages): State<PackageOperations>,
) -> Result<Json<Vec<CampaignPackage>>, ApiError> {
    let correlation_id = correlation_id();
    packages.list_packages().await.map(Json).map_err(|error| api_error(error, &correlation_id))
}

async fn create_package(
    State(packages): State<PackageOperations>,
    Json(package): Json<NewPackage>,
) -> Result<(StatusCode, Json<CampaignPackage>), ApiError> {
    let correlation_id = correlation_id();
    let created =
        packages.create_package(package).await.map_err(|error| api_error(error, &correlation_id))?;
    info!(
        event_name = "api.package.created",
        correlation_id = %correlation_id,
        package_id = %created.id.0,
        "campaign package created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_package(
    Path(id): Path<String>,
    State(packages): State<PackageOperations>,
    Json(update): Json<PackageUpdate>,
) -> Result<Json<CampaignPackage>, ApiError> {
    let correlation_id = correlation_id();
    if update.is_empty() {
        return Err(bad_request("at least one package field must be supplied", &correlation_id));
    }
    packages
        .update_package(&PackageId(id), update)
        .await
        .map(Json)
        .map_err(|error| api_error(error, &correlation_id))
}

async fn delete_package(
    Path(id): Path<String>,
    State(packages): State<PackageOperations>,
) -> Result<StatusCode, ApiError> {
    let correlation_id = correlation_id();
    packages
        .delete_package(&PackageId(id))
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|error| api_error(error, &correlation_id))
}
