use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "user_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "user_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Admin,
    Student,
    Instructor,
}

impl UserStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Blocked => "BLOCKED",
        }
    }
}

impl UserType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Student => "STUDENT",
            Self::Instructor => "INSTRUCTOR",
        }
    }
}

impl Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::Token;

    #[test]
    fn test_serde_impl() {
        serde_test::assert_tokens(
            &UserStatus::Active,
            &[Token::UnitVariant {
                name: "UserStatus",
                variant: "ACTIVE",
            }],
        );
        serde_test::assert_tokens(
            &UserType::Instructor,
            &[Token::UnitVariant {
                name: "UserType",
                variant: "INSTRUCTOR",
            }],
        );
    }

    #[test]
    fn text_rendering_matches_wire_names() {
        assert_eq!(UserStatus::Blocked.to_string(), "BLOCKED");
        assert_eq!(UserType::Student.to_string(), "STUDENT");
    }
}
