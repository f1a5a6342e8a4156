use std::sync::Arc;

use crate::config;
use crate::courses::CourseClient;
use crate::schema::User;
use crate::services::UserService;
use crate::App;

mod memory;
pub mod users;

pub use memory::{MemoryUserStore, RecordingPublisher};

/// Port nobody listens on, so every course lookup ends in the fallback.
pub const UNREACHABLE_COURSE_SERVICE: &str = "http://127.0.0.1:9";

pub fn init_tracing() {
    crate::logging::init_for_tests();
}

#[must_use]
pub fn course_config(base_url: &str, max_attempts: usize) -> config::CourseService {
    config::CourseService {
        base_url: base_url.to_string(),
        timeout_ms: 1000,
        retry: config::RetryPolicy {
            max_attempts,
            wait_ms: 0,
            multiplier: 1.0,
        },
    }
}

/// In-memory collaborators shared by one test.
pub struct TestContext {
    pub store: Arc<MemoryUserStore>,
    pub publisher: Arc<RecordingPublisher>,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        init_tracing();
        Self {
            store: Arc::new(MemoryUserStore::default()),
            publisher: Arc::new(RecordingPublisher::default()),
        }
    }

    #[must_use]
    pub fn service(&self) -> UserService {
        UserService::new(self.store.clone(), self.publisher.clone())
    }

    /// Puts the record straight into the store without publishing.
    pub fn insert(&self, user: User) -> User {
        self.store.put(user.clone());
        user
    }

    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn app(&self, course_base_url: &str) -> App {
        let courses = CourseClient::new(&course_config(course_base_url, 1)).unwrap();
        App::from_parts(self.service(), courses)
    }
}

/// Builds an [`App`] whose course lookups always fall back.
#[must_use]
pub fn build_test_app() -> (App, TestContext) {
    let ctx = TestContext::new();
    let app = ctx.app(UNREACHABLE_COURSE_SERVICE);
    (app, ctx)
}

/// Builds the routed HTTP service around an [`App`], ready for
/// `actix_web::test::call_service`.
macro_rules! init_http_service {
    ($app:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($app))
                .configure(crate::http::configure),
        )
        .await
    };
}

pub(crate) use init_http_service;
