use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

/// Remote course service consulted by `GET /users/{userId}/courses`.
#[derive(Debug, Deserialize, Validate)]
pub struct CourseService {
    /// **Environment variables**:
    /// - `AUTHUSER_COURSES_BASE_URL`
    #[validate(url)]
    pub base_url: String,
    /// Connect and read timeout of a single attempt.
    ///
    /// **Environment variables**:
    /// - `AUTHUSER_COURSES_TIMEOUT_MS`
    #[serde(default = "CourseService::default_timeout_ms")]
    #[validate(range(min = 1))]
    pub timeout_ms: u64,
    #[serde(default)]
    #[validate(nested)]
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RetryPolicy {
    /// **Environment variables**:
    /// - `AUTHUSER_COURSES_RETRY_MAX_ATTEMPTS`
    #[serde(default = "RetryPolicy::default_max_attempts")]
    #[validate(range(min = 1, max = 20))]
    pub max_attempts: usize,
    /// **Environment variables**:
    /// - `AUTHUSER_COURSES_RETRY_WAIT_MS`
    #[serde(default = "RetryPolicy::default_wait_ms")]
    pub wait_ms: u64,
    /// **Environment variables**:
    /// - `AUTHUSER_COURSES_RETRY_MULTIPLIER`
    #[serde(default = "RetryPolicy::default_multiplier")]
    #[validate(range(min = 1.0, max = 10.0))]
    pub multiplier: f64,
}

impl CourseService {
    fn default_timeout_ms() -> u64 {
        5000
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl RetryPolicy {
    fn default_max_attempts() -> usize {
        3
    }

    fn default_wait_ms() -> u64 {
        500
    }

    fn default_multiplier() -> f64 {
        1.0
    }

    #[must_use]
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::default_max_attempts(),
            wait_ms: Self::default_wait_ms(),
            multiplier: Self::default_multiplier(),
        }
    }
}
