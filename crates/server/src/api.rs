use axum::{http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use snapactivate_core::errors::{ApplicationError, DomainError, InterfaceError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub error: String,
    pub correlation_id: String,
}

pub type ApiError = (StatusCode, Json<ApiErrorBody>);

pub fn correlation_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn status_for(error: &InterfaceError) -> StatusCode {
    match error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Logs the detailed failure and answers with the user-safe message only.
pub fn api_error(error: impl Into<ApplicationError>, correlation_id: &str) -> ApiError {
    let interface = error.into().into_interface(correlation_id);
    warn!(
        event_name = "api.request.failed",
        correlation_id = %correlation_id,
        error = %interface,
        "request failed"
    );
    (
        status_for(&interface),
        Json(ApiErrorBody {
            error: interface.user_message().to_string(),
            correlation_id: correlation_id.to_string(),
        }),
    )
}

pub fn bad_request(message: impl Into<String>, correlation_id: &str) -> ApiError {
    api_error(DomainError::InvariantViolation(message.into()), correlation_id)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use snapactivate_core::errors::ApplicationError;

    use super::api_error;

    #[test]
    fn authentication_failures_are_unauthorized_without_details() {
        let (status, body) = api_error(ApplicationError::Authentication("brand b-9".to_string()), "req-1");

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.correlation_id, "req-1");
        assert!(!body.error.contains("b-9"));
    }

    #[test]
    fn persistence_failures_are_service_unavailable() {
        let (status, _) = api_error(ApplicationError::Persistence("disk".to_string()), "req-2");
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
