use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::Report;

use super::Error;
use crate::{database, types::Error as ErrorType};

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::NotFound { .. } => StatusCode::NOT_FOUND,
            ErrorType::Conflict { .. } => StatusCode::CONFLICT,
            ErrorType::ReadonlyMode => StatusCode::SERVICE_UNAVAILABLE,
            ErrorType::InvalidFormBody { .. } | ErrorType::InvalidRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        HttpResponse::build(status).json(&self.error_type)
    }
}

impl From<ErrorType> for Error {
    fn from(value: ErrorType) -> Self {
        Error::new(value)
    }
}

impl From<Report<database::Error>> for Error {
    fn from(value: Report<database::Error>) -> Self {
        match value.current_context() {
            database::Error::Readonly => Error::from_report(ErrorType::ReadonlyMode, value),
            database::Error::UniqueViolation(constraint) => {
                let message = if constraint.contains("email") {
                    "Error: Email is already taken."
                } else {
                    "Error: Username is already taken."
                };
                Error::from_report(ErrorType::conflict(message), value)
            }
            _ => Error::from_report(ErrorType::Internal, value),
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(value: validator::ValidationErrors) -> Self {
        #[derive(Debug, thiserror::Error)]
        #[error("Validation error occurred")]
        struct ValidateError;
        Error::from_context(ErrorType::InvalidFormBody { errors: value }, ValidateError)
    }
}
