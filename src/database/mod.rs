use error_stack::{Report, ResultExt};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::{str::FromStr, time::Duration};

use crate::config;

pub mod error;
pub use error::{Error, ErrorExt, ErrorExt2, Result};

pub type Transaction<'a> = sqlx::Transaction<'a, sqlx::Postgres>;
pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Postgres>;
pub type Connection = sqlx::PgConnection;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Lazily connected Postgres pool. Construction succeeds even when the
/// server is down so the service can start before its database does.
#[derive(Clone)]
pub struct Pool {
    pool: sqlx::PgPool,
}

impl Pool {
    pub async fn new(
        global_cfg: &config::Database,
        pool_cfg: &config::DbPoolConfig,
    ) -> Result<Self> {
        let connect_opts = connect_options(pool_cfg, global_cfg.enforce_tls)?;
        let pool = Self {
            pool: pool_options(global_cfg, pool_cfg).connect_lazy_with(connect_opts),
        };

        if let Err(err) = pool.wait_until_healthy().await {
            if !err.is_unhealthy() {
                return Err(err);
            }
            tracing::warn!(?err, "database is not reachable yet, connecting lazily");
        }

        Ok(pool)
    }

    #[cfg(test)]
    pub(crate) fn from_pool(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// A pool that has never managed to open a connection, or has been
    /// closed, is unhealthy.
    pub fn is_healthy(&self) -> bool {
        !self.pool.is_closed() && self.pool.size() > 0
    }

    #[tracing::instrument(name = "db.transaction", skip(self))]
    pub async fn begin(&self) -> Result<Transaction<'static>> {
        if let Some(tx) = self.pool.try_begin().await.into_db_error()? {
            return Ok(tx);
        }

        self.ensure_healthy()?;
        self.pool.begin().await.into_db_error()
    }

    #[tracing::instrument(name = "db.connect", skip(self))]
    pub async fn get(&self) -> Result<PoolConnection> {
        if let Some(conn) = self.pool.try_acquire() {
            return Ok(conn);
        }

        self.ensure_healthy()?;
        self.pool.acquire().await.into_db_error()
    }

    /// Opens one connection. A failure on a pool that has no live
    /// connection is reported as [`Error::UnhealthyPool`].
    #[tracing::instrument(skip(self))]
    pub async fn wait_until_healthy(&self) -> Result<()> {
        let Err(err) = self.pool.acquire().await else {
            return Ok(());
        };

        let report = Report::new(Error::Internal(err));
        if self.is_healthy() {
            Err(report)
        } else {
            Err(report.change_context(Error::UnhealthyPool))
        }
    }

    #[tracing::instrument(name = "db.migrate", skip(self))]
    pub async fn migrate(&self) -> Result<()> {
        let now = std::time::Instant::now();
        tracing::info!("applying users schema migrations");

        MIGRATOR
            .run(&self.pool)
            .await
            .change_context(Error::Migration)?;

        tracing::info!(elapsed = ?now.elapsed(), "users schema is up to date");
        Ok(())
    }

    fn ensure_healthy(&self) -> Result<()> {
        if self.is_healthy() {
            Ok(())
        } else {
            Err(Report::new(Error::UnhealthyPool))
        }
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("size", &self.pool.size())
            .field("idle", &self.pool.num_idle())
            .field("closed", &self.pool.is_closed())
            .finish()
    }
}

fn pool_options(global_cfg: &config::Database, pool_cfg: &config::DbPoolConfig) -> PgPoolOptions {
    let opts = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(global_cfg.timeout_secs.get()))
        .max_connections(pool_cfg.pool_size.get());

    match pool_cfg.min_idle {
        Some(min_idle) => opts.min_connections(min_idle.get()),
        None => opts,
    }
}

fn connect_options(pool_cfg: &config::DbPoolConfig, enforce_tls: bool) -> Result<PgConnectOptions> {
    let opts = PgConnectOptions::from_str(pool_cfg.url.as_str())
        .change_context(Error::InvalidUrl)
        .attach_printable("could not parse the Postgres connection url")?;

    Ok(if enforce_tls {
        opts.ssl_mode(PgSslMode::Prefer)
    } else {
        opts
    })
}
