use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("missing required campaign field `{0}`")]
    MissingSetupField(String),
    #[error("invalid campaign field `{field}`: {reason}")]
    InvalidSetupField { field: String, reason: String },
    #[error("invalid ticket priority `{0}`; expected Urgent, High or General Query")]
    InvalidPriority(String),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("authentication failure: {0}")]
    Authentication(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("integration failure: {0}")]
    Integration(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("unauthorized: {message}")]
    Unauthorized { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Unauthorized { .. } => "We could not verify your account. Please sign in again.",
            Self::NotFound { .. } => "The requested record could not be found.",
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::Unauthorized { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::NotFound { message, .. }
            | Self::ServiceUnavailable { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Unauthorized { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::Domain(error) => {
                Self::BadRequest { message: error.to_string(), correlation_id }
            }
            ApplicationError::NotFound(message) => Self::NotFound { message, correlation_id },
            ApplicationError::Authentication(message) => {
                Self::Unauthorized { message, correlation_id }
            }
            ApplicationError::Persistence(message) | ApplicationError::Integration(message) => {
                Self::ServiceUnavailable { message, correlation_id }
            }
            ApplicationError::Configuration(message) => Self::Internal { message, correlation_id },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError, InterfaceError};

    #[test]
    fn domain_error_maps_to_bad_request_interface_error() {
        let interface =
            ApplicationError::from(DomainError::MissingSetupField("locationZone".to_owned()))
                .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ref message,
            } if correlation_id == "req-1" && message.contains("locationZone")
        ));
    }

    #[test]
    fn bad_request_has_user_safe_message() {
        let interface = ApplicationError::from(DomainError::InvalidPriority("Critical".to_owned()))
            .into_interface("req-2");

        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn authentication_error_maps_to_unauthorized() {
        let interface =
            ApplicationError::Authentication("unknown brand".to_owned()).into_interface("req-5");

        assert!(matches!(interface, InterfaceError::Unauthorized { .. }));
        assert_eq!(interface.correlation_id(), "req-5");
    }

    #[test]
    fn persistence_error_maps_to_service_unavailable() {
        let interface = ApplicationError::Persistence("database lock timeout".to_owned())
            .into_interface("req-3");

        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
        assert_eq!(
            interface.user_message(),
            "The service is temporarily unavailable. Please retry shortly."
        );
    }

    #[test]
    fn configuration_error_maps_to_internal() {
        let interface =
            ApplicationError::Configuration("missing api key".to_owned()).into_interface("req-4");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }
}
