use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use validator::Validate;

use crate::util::Sensitive;

#[derive(Debug, Deserialize, Validate)]
pub struct Database {
    /// Writable primary database.
    #[validate(nested)]
    pub primary: DbPoolConfig,
    /// A read-only replica database used for lookups and listings
    /// without interacting with the main database.
    #[validate(nested)]
    pub replica: Option<DbPoolConfig>,
    /// Forces all database connections are encrypted with TLS
    /// (if possible).
    ///
    /// **Environment variables**:
    /// - `AUTHUSER_DB_ENFORCE_TLS`
    #[serde(default = "Database::default_enforce_tls")]
    pub enforce_tls: bool,
    /// How long this server can wait until its time limit where the
    /// database connection takes a while to acknowledge or
    /// successfully established.
    ///
    /// **Environment variables**:
    /// - `AUTHUSER_DB_TIMEOUT_SECS`
    #[serde(default = "Database::default_timeout_secs")]
    pub timeout_secs: NonZeroU64,
}

/// Configuration for connecting to any Postgres database
#[derive(Debug, Deserialize, Validate)]
pub struct DbPoolConfig {
    /// Minimum idle database connections just to avoid wasting
    /// hardware resources from the database server.
    ///
    /// **Environment variables**:
    /// - `AUTHUSER_DB_PRIMARY_MIN_IDLE`
    /// - `AUTHUSER_DB_REPLICA_MIN_IDLE`
    pub min_idle: Option<NonZeroU32>,
    /// Maximum amount of pool size that database can handle
    ///
    /// **Environment variables**:
    /// - `AUTHUSER_DB_PRIMARY_POOL_SIZE`
    /// - `AUTHUSER_DB_REPLICA_POOL_SIZE`
    #[serde(default = "DbPoolConfig::default_pool_size")]
    pub pool_size: NonZeroU32,
    /// Connection URL connecting to the Postgres database.
    ///
    /// **Environment variables**:
    /// - `AUTHUSER_DB_PRIMARY_URL` or `DATABASE_URL`
    /// - `AUTHUSER_DB_REPLICA_URL`
    #[validate(custom(function = "super::validate_url"))]
    pub url: Sensitive<String>,
}

impl Database {
    const DEFAULT_TIMEOUT_SECS: u64 = 5;

    const fn default_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
        }
    }

    const fn default_enforce_tls() -> bool {
        true
    }
}

impl DbPoolConfig {
    const DEFAULT_POOL_SIZE: u32 = 5;

    // Required by serde
    const fn default_pool_size() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
        }
    }
}
