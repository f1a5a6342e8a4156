use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    database::{error::ErrorExt, Connection, Result},
    store::{UserFilter, UserSortField},
    types::{PageRequest, SortDirection, UserStatus, UserType},
    util::Sensitive,
};

#[derive(Debug, Clone, FromRow, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[sqlx(try_from = "String")]
    pub password: Sensitive<String>,
    pub full_name: String,
    pub user_status: UserStatus,
    pub user_type: UserType,
    pub phone_number: Option<String>,
    pub national_id: Option<String>,
    pub image_url: Option<String>,
    pub creation_date: DateTime<Utc>,
    pub last_update_date: DateTime<Utc>,
}

impl User {
    #[tracing::instrument(skip(conn), name = "query.users.find")]
    pub async fn by_id(conn: &mut Connection, id: Uuid) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE user_id = $1"#)
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "query.users.is_username_taken")]
    pub async fn check_username_taken(conn: &mut Connection, username: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS(SELECT 1 FROM "users" WHERE username = $1)"#)
            .bind(username)
            .fetch_one(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "query.users.is_email_taken")]
    pub async fn check_email_taken(conn: &mut Connection, email: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS(SELECT 1 FROM "users" WHERE email = $1)"#)
            .bind(email)
            .fetch_one(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, fields(user.id = %self.user_id), name = "query.users.insert")]
    pub async fn insert(&self, conn: &mut Connection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO "users" (
                user_id, username, email, password, full_name, user_status, user_type,
                phone_number, national_id, image_url, creation_date, last_update_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *"#,
        )
        .bind(self.user_id)
        .bind(&self.username)
        .bind(&self.email)
        .bind(self.password.as_str())
        .bind(&self.full_name)
        .bind(self.user_status)
        .bind(self.user_type)
        .bind(self.phone_number.as_deref())
        .bind(self.national_id.as_deref())
        .bind(self.image_url.as_deref())
        .bind(self.creation_date)
        .bind(self.last_update_date)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    /// Writes every mutable column back. `None` means the row vanished
    /// in the meantime.
    #[tracing::instrument(skip_all, fields(user.id = %self.user_id), name = "query.users.update")]
    pub async fn update(&self, conn: &mut Connection) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE "users" SET
                username = $2, email = $3, password = $4, full_name = $5,
                user_status = $6, user_type = $7, phone_number = $8,
                national_id = $9, image_url = $10, last_update_date = $11
            WHERE user_id = $1
            RETURNING *"#,
        )
        .bind(self.user_id)
        .bind(&self.username)
        .bind(&self.email)
        .bind(self.password.as_str())
        .bind(&self.full_name)
        .bind(self.user_status)
        .bind(self.user_type)
        .bind(self.phone_number.as_deref())
        .bind(self.national_id.as_deref())
        .bind(self.image_url.as_deref())
        .bind(self.last_update_date)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(conn), name = "query.users.delete")]
    pub async fn delete(conn: &mut Connection, id: Uuid) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM "users" WHERE user_id = $1"#)
            .bind(id)
            .execute(conn)
            .await
            .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(conn), name = "query.users.list")]
    pub async fn list(
        conn: &mut Connection,
        filter: &UserFilter,
        request: &PageRequest,
        sort: UserSortField,
    ) -> Result<Vec<Self>> {
        let mut query = UserQueryBuilder::new(r#"SELECT * FROM "users""#, filter).finish();
        query.push(" ORDER BY ");
        query.push(sort.column());
        query.push(match request.sort.direction {
            SortDirection::Asc => " ASC",
            SortDirection::Desc => " DESC",
        });

        // tie-breaker keeps pages stable when the sort column repeats
        if sort != UserSortField::UserId {
            query.push(", user_id ASC");
        }

        query.push(" LIMIT ");
        query.push_bind(i64::from(request.size));
        query.push(" OFFSET ");
        query.push_bind(i64::try_from(request.offset()).unwrap_or(i64::MAX));

        query
            .build_query_as::<Self>()
            .fetch_all(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip(conn), name = "query.users.count")]
    pub async fn count(conn: &mut Connection, filter: &UserFilter) -> Result<i64> {
        UserQueryBuilder::new(r#"SELECT COUNT(*) FROM "users""#, filter)
            .finish()
            .build_query_scalar::<i64>()
            .fetch_one(conn)
            .await
            .into_db_error()
    }
}

/// Translates a [`UserFilter`] into `WHERE` conditions joined by `AND`.
pub struct UserQueryBuilder<'a> {
    query: QueryBuilder<'a, Postgres>,
    has_condition: bool,
}

impl<'a> UserQueryBuilder<'a> {
    #[must_use]
    pub fn new(select: &str, filter: &UserFilter) -> Self {
        let mut this = Self {
            query: QueryBuilder::new(select),
            has_condition: false,
        };

        if let Some(user_type) = filter.user_type {
            this.condition("user_type = ").push_bind(user_type);
        }

        if let Some(user_status) = filter.user_status {
            this.condition("user_status = ").push_bind(user_status);
        }

        if let Some(email) = filter.email.as_deref() {
            this.condition("email ILIKE ").push_bind(like_pattern(email));
        }

        if let Some(full_name) = filter.full_name.as_deref() {
            this.condition("full_name ILIKE ").push_bind(like_pattern(full_name));
        }

        if let Some(after) = filter.created_after {
            this.condition("creation_date >= ").push_bind(after);
        }

        if let Some(before) = filter.created_before {
            this.condition("creation_date <= ").push_bind(before);
        }

        this
    }

    fn condition(&mut self, sql: &str) -> &mut QueryBuilder<'a, Postgres> {
        self.query
            .push(if self.has_condition { " AND " } else { " WHERE " });
        self.has_condition = true;
        self.query.push(sql)
    }

    #[must_use]
    pub fn finish(self) -> QueryBuilder<'a, Postgres> {
        self.query
    }
}

/// Wraps a value into a `%...%` pattern, escaping the wildcards it
/// already contains.
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{escaped}%")
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn no_filter_means_no_where_clause() {
        let filter = UserFilter::default();
        let builder = UserQueryBuilder::new(r#"SELECT * FROM "users""#, &filter);
        assert_eq!(builder.finish().sql(), r#"SELECT * FROM "users""#);
    }

    #[test]
    fn conditions_are_and_combined() {
        let filter = UserFilter {
            user_type: Some(UserType::Instructor),
            user_status: Some(UserStatus::Active),
            email: Some("example.com".into()),
            full_name: None,
            created_after: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            created_before: None,
        };

        let builder = UserQueryBuilder::new(r#"SELECT COUNT(*) FROM "users""#, &filter);
        assert_eq!(
            builder.finish().sql(),
            r#"SELECT COUNT(*) FROM "users" WHERE user_type = $1 AND user_status = $2 AND email ILIKE $3 AND creation_date >= $4"#
        );
    }

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(like_pattern("alice"), "%alice%");
        assert_eq!(like_pattern("100%_sure"), "%100\\%\\_sure%");
    }
}
