use actix_web::{error::JsonPayloadError, web, HttpRequest};

use super::Error;
use crate::types;

#[derive(Debug, thiserror::Error)]
#[error("Could not extract request input")]
struct ExtractError;

fn reject(message: String) -> actix_web::Error {
    Error::from_context(types::Error::invalid_request(message), ExtractError).into()
}

/// Routes malformed bodies, query strings and path segments through
/// the [`Error`] body instead of actix's plain text responses.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(|err, _| reject(err.to_string())))
        .app_data(web::PathConfig::default().error_handler(|err, _| reject(err.to_string())));
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "rejected request body");
    match err {
        JsonPayloadError::ContentType => reject("Expected an application/json body".into()),
        other => reject(other.to_string()),
    }
}
