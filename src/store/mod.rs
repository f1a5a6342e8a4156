use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::Result;
use crate::schema::User;
use crate::types::{Page, PageRequest, UserStatus, UserType};

mod postgres;
pub use postgres::PgUserStore;

/// Persistent table of user records.
///
/// Timestamps are never touched here, callers set them before
/// handing the record over.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    async fn exists_by_username(&self, username: &str) -> Result<bool>;
    async fn exists_by_email(&self, email: &str) -> Result<bool>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_all(&self, filter: &UserFilter, request: &PageRequest) -> Result<Page<User>>;
    async fn insert(&self, user: &User) -> Result<User>;
    /// Returns `None` if there is no record with that id anymore.
    async fn update(&self, user: &User) -> Result<Option<User>>;
    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Optional listing conditions, all combined with `AND`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub user_type: Option<UserType>,
    pub user_status: Option<UserStatus>,
    /// Case-insensitive substring match.
    pub email: Option<String>,
    /// Case-insensitive substring match.
    pub full_name: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl UserFilter {
    /// Evaluates the filter against an already loaded record.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        fn contains(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }

        self.user_type.map_or(true, |v| user.user_type == v)
            && self.user_status.map_or(true, |v| user.user_status == v)
            && self.email.as_deref().map_or(true, |v| contains(&user.email, v))
            && self
                .full_name
                .as_deref()
                .map_or(true, |v| contains(&user.full_name, v))
            && self.created_after.map_or(true, |v| user.creation_date >= v)
            && self.created_before.map_or(true, |v| user.creation_date <= v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortField {
    UserId,
    Username,
    Email,
    FullName,
    CreationDate,
    LastUpdateDate,
}

impl UserSortField {
    pub const DEFAULT_PROPERTY: &'static str = "userId";

    #[must_use]
    pub fn from_property(property: &str) -> Option<Self> {
        match property {
            "userId" => Some(Self::UserId),
            "username" => Some(Self::Username),
            "email" => Some(Self::Email),
            "fullName" => Some(Self::FullName),
            "creationDate" => Some(Self::CreationDate),
            "lastUpdateDate" => Some(Self::LastUpdateDate),
            _ => None,
        }
    }

    #[must_use]
    pub fn resolve(request: &PageRequest) -> Self {
        Self::from_property(&request.sort.property).unwrap_or(Self::UserId)
    }

    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::UserId => "user_id",
            Self::Username => "username",
            Self::Email => "email",
            Self::FullName => "full_name",
            Self::CreationDate => "creation_date",
            Self::LastUpdateDate => "last_update_date",
        }
    }
}
