use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{
    config,
    courses::CourseClient,
    database,
    events::AmqpUserEventPublisher,
    services::UserService,
    store::PgUserStore,
};

/// Everything a request handler may need, cloned into every worker.
#[derive(Debug, Clone)]
pub struct App {
    pub users: UserService,
    pub courses: CourseClient,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
    #[tracing::instrument(skip_all)]
    pub async fn new(cfg: &config::Server) -> Result<Self, AppError> {
        let primary_db = database::Pool::new(&cfg.db, &cfg.db.primary)
            .await
            .change_context(AppError)?;

        let replica_db = if let Some(replica) = cfg.db.replica.as_ref() {
            let pool = database::Pool::new(&cfg.db, replica)
                .await
                .change_context(AppError)?;

            Some(pool)
        } else {
            None
        };

        primary_db
            .migrate()
            .await
            .change_context(AppError)
            .attach_printable("could not migrate the primary database")?;

        let publisher = AmqpUserEventPublisher::connect(&cfg.broker)
            .await
            .change_context(AppError)?;

        let courses = CourseClient::new(&cfg.courses).change_context(AppError)?;
        let store = PgUserStore::new(primary_db, replica_db);

        Ok(Self::from_parts(
            UserService::new(Arc::new(store), Arc::new(publisher)),
            courses,
        ))
    }

    #[must_use]
    pub fn from_parts(users: UserService, courses: CourseClient) -> Self {
        Self { users, courses }
    }
}
