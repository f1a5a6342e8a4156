use serde::Deserialize;
use validator::Validate;

use crate::util::Sensitive;

/// Message broker the user events are published to.
#[derive(Debug, Deserialize, Validate)]
pub struct Broker {
    /// AMQP connection URL.
    ///
    /// **Environment variables**:
    /// - `AUTHUSER_BROKER_URL` or `AMQP_URL`
    #[validate(custom(function = "super::validate_url"))]
    pub url: Sensitive<String>,
    /// Name of the fan-out exchange receiving every user event.
    ///
    /// **Environment variables**:
    /// - `AUTHUSER_BROKER_USER_EVENT_EXCHANGE`
    #[serde(default = "Broker::default_user_event_exchange")]
    #[validate(length(min = 1, max = 255))]
    pub user_event_exchange: String,
}

impl Broker {
    fn default_user_event_exchange() -> String {
        "ead.userevent".to_string()
    }
}
