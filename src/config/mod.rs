use std::borrow::Cow;
use thiserror::Error;
use validator::ValidationError;

use crate::util::Sensitive;

mod broker;
mod courses;
mod database;
mod http;
mod logging;
mod server;

pub use broker::Broker;
pub use courses::{CourseService, RetryPolicy};
pub use database::{Database, DbPoolConfig};
pub use http::Http;
pub use logging::{Logging, LoggingStyle};
pub use server::Server;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;

fn validate_url(url: &Sensitive<String>) -> Result<(), ValidationError> {
    match url::Url::parse(url.as_str()) {
        Ok(..) => Ok(()),
        Err(..) => {
            let mut error = ValidationError::new("url");
            error.message = Some(Cow::Borrowed("Invalid connection URL"));
            Err(error)
        }
    }
}
