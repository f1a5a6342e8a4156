use async_trait::async_trait;
use error_stack::ResultExt;
use uuid::Uuid;

use super::{UserFilter, UserSortField, UserStore};
use crate::database::{self, error::ErrorExt, ErrorExt2, Result};
use crate::schema::User;
use crate::types::{Page, PageRequest};

/// [`UserStore`] backed by Postgres. Reads go to the replica when one
/// is configured and healthy.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    primary_db: database::Pool,
    replica_db: Option<database::Pool>,
}

impl PgUserStore {
    #[must_use]
    pub fn new(primary_db: database::Pool, replica_db: Option<database::Pool>) -> Self {
        Self {
            primary_db,
            replica_db,
        }
    }

    #[tracing::instrument(skip_all)]
    async fn db_read(&self) -> Result<database::PoolConnection> {
        if let Some(replica) = self.replica_db.as_ref() {
            match replica.get().await {
                Ok(conn) => return Ok(conn),
                // fallback
                Err(err) if err.is_unhealthy() => {}
                Err(err) => return Err(err),
            }
        }
        self.primary_db.get().await
    }

    #[tracing::instrument(skip_all)]
    async fn db_read_prefer_primary(&self) -> Result<database::PoolConnection> {
        match (self.primary_db.get().await, self.replica_db.as_ref()) {
            (Ok(conn), ..) => Ok(conn),
            (Err(e), Some(readonly_replica)) if e.is_unhealthy() => readonly_replica.get().await,
            (Err(e), ..) => Err(e),
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        // uniqueness checks must see the latest writes
        let mut conn = self.db_read_prefer_primary().await?;
        User::check_username_taken(&mut conn, username).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let mut conn = self.db_read_prefer_primary().await?;
        User::check_email_taken(&mut conn, email).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let mut conn = self.db_read_prefer_primary().await?;
        User::by_id(&mut conn, id).await
    }

    async fn find_all(&self, filter: &UserFilter, request: &PageRequest) -> Result<Page<User>> {
        let mut conn = self.db_read().await?;
        let sort = UserSortField::resolve(request);

        let total = User::count(&mut conn, filter).await?;
        let content = User::list(&mut conn, filter, request, sort).await?;

        let total = u64::try_from(total).unwrap_or_default();
        Ok(Page::new(content, request, total))
    }

    async fn insert(&self, user: &User) -> Result<User> {
        let mut tx = self.primary_db.begin().await?;
        let user = user.insert(&mut tx).await?;
        tx.commit()
            .await
            .into_db_error()
            .attach_printable("could not commit user insert")?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<Option<User>> {
        let mut tx = self.primary_db.begin().await?;
        let user = user.update(&mut tx).await?;
        tx.commit()
            .await
            .into_db_error()
            .attach_printable("could not commit user update")?;

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.primary_db.begin().await?;
        let deleted = User::delete(&mut tx, id).await?;
        tx.commit()
            .await
            .into_db_error()
            .attach_printable("could not commit user delete")?;

        Ok(deleted)
    }
}
