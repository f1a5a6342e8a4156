use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::util::Sensitive;

pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 20;

fn validate_password(password: &Sensitive<String>) -> Result<(), ValidationError> {
    let len = password.as_str().chars().count();
    if (PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        Ok(())
    } else {
        let mut error = ValidationError::new("length");
        error.message = Some(Cow::Owned(format!(
            "Passwords must be between {PASSWORD_MIN} and {PASSWORD_MAX} characters"
        )));
        Err(error)
    }
}

// validator hands custom functions a reference to the field type
#[allow(clippy::ptr_arg)]
fn validate_not_blank(value: &String) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some(Cow::Borrowed("Must not be blank"));
        Err(error)
    } else {
        Ok(())
    }
}

/// `POST /auth/signup`
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    #[validate(length(min = 4, max = 50))]
    pub username: String,
    #[validate(email(message = "Invalid e-mail address"), length(max = 50))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: Sensitive<String>,
    #[validate(length(min = 1, max = 150))]
    pub full_name: String,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
    #[validate(length(max = 20))]
    pub national_id: Option<String>,
}

/// `PUT /users/{userId}`
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 150))]
    pub full_name: String,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
    #[validate(length(max = 20))]
    pub national_id: Option<String>,
}

/// `PUT /users/{userId}/password`
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePassword {
    #[validate(custom(function = "validate_password"))]
    pub password: Sensitive<String>,
    #[validate(custom(function = "validate_password"))]
    pub old_password: Sensitive<String>,
}

/// `PUT /users/{userId}/image`
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateImage {
    #[validate(custom(function = "validate_not_blank"), length(max = 255))]
    pub image_url: String,
}

/// `POST /instructors/subscription`
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorSubscription {
    pub user_id: Uuid,
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register_json() -> serde_json::Value {
        json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "hunter22",
            "fullName": "Alice Liddell",
            "phoneNumber": "555-0100",
            "nationalId": "12345678900",
        })
    }

    #[test]
    fn register_view_accepts_valid_body() {
        let form: Register = serde_json::from_value(register_json()).unwrap();
        assert!(form.validate().is_ok());
        assert_eq!(form.password.as_str(), "hunter22");
    }

    #[test]
    fn register_view_ignores_fields_outside_the_view() {
        let mut body = register_json();
        body["userType"] = json!("ADMIN");
        body["imageUrl"] = json!("https://example.com/a.png");

        let form: Register = serde_json::from_value(body).unwrap();
        let echoed = serde_json::to_value(&form).unwrap();
        assert!(echoed.get("userType").is_none());
        assert!(echoed.get("imageUrl").is_none());
    }

    #[test]
    fn register_view_rejects_invalid_fields() {
        let invalid = [
            ("username", json!("abc")),
            ("email", json!("not-an-email")),
            ("password", json!("short")),
            ("password", json!("thispasswordiswaytoolong")),
            ("fullName", json!("")),
        ];

        for (field, value) in invalid {
            let mut body = register_json();
            body[field] = value.clone();
            let form: Register = serde_json::from_value(body).unwrap();
            assert!(
                form.validate().is_err(),
                "expected {field} = {value} to be rejected"
            );
        }
    }

    #[test]
    fn password_view_requires_both_passwords() {
        let result = serde_json::from_value::<UpdatePassword>(json!({ "password": "newsecret" }));
        assert!(result.is_err());

        let form: UpdatePassword = serde_json::from_value(json!({
            "password": "newsecret",
            "oldPassword": "hunter22",
        }))
        .unwrap();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn image_view_rejects_blank_url() {
        let form: UpdateImage = serde_json::from_value(json!({ "imageUrl": "   " })).unwrap();
        assert!(form.validate().is_err());
    }
}
