use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;
use uuid::Uuid;

use crate::schema::User;

mod amqp;
pub use amqp::AmqpUserEventPublisher;

#[derive(Debug, Error)]
#[error("Failed to publish user event")]
pub struct PublishError;

/// Broadcasts user events to every subscriber bound to the channel.
///
/// Implementations must not wait for subscribers to acknowledge the
/// message. A returned error only means the message could not be
/// handed to the transport.
#[async_trait]
pub trait UserEventPublisher: Send + Sync + 'static {
    async fn publish(&self, event: &UserEvent) -> error_stack::Result<(), PublishError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Create,
    Update,
    Delete,
}

impl ActionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Denormalized projection of a [`User`] sent over the wire. The
/// password never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub user_status: String,
    pub user_type: String,
    pub phone_number: Option<String>,
    pub national_id: Option<String>,
    pub image_url: Option<String>,
    pub action_type: Option<ActionType>,
}

impl UserEvent {
    /// Stamps the action tag onto the payload.
    #[must_use]
    pub fn with_action(mut self, action: ActionType) -> Self {
        self.action_type = Some(action);
        self
    }
}

impl From<&User> for UserEvent {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            user_status: user.user_status.to_string(),
            user_type: user.user_type.to_string(),
            phone_number: user.phone_number.clone(),
            national_id: user.national_id.clone(),
            image_url: user.image_url.clone(),
            action_type: None,
        }
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    #[test]
    fn wire_format() {
        let user = crate::test_utils::users::alice();
        let event = UserEvent::from(&user).with_action(ActionType::Update);

        assert_json_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "userId": user.user_id,
                "username": "alice",
                "email": "alice@example.com",
                "fullName": "Alice Liddell",
                "userStatus": "ACTIVE",
                "userType": "STUDENT",
                "phoneNumber": "555-0100",
                "nationalId": null,
                "imageUrl": null,
                "actionType": "UPDATE",
            })
        );
    }

    #[test]
    fn never_carries_the_password() {
        let user = crate::test_utils::users::alice();
        let payload = serde_json::to_string(&UserEvent::from(&user)).unwrap();
        assert!(!payload.contains(user.password.as_str()));
        assert!(!payload.contains("password"));
    }
}
