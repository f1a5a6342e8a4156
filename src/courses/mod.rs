use error_stack::{Report, Result, ResultExt};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::config;
use crate::types::{Page, PageRequest};
use crate::util::{Retry, RetryFailed};

/// Course as seen through the course service listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub course_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub course_status: Option<String>,
    pub course_level: Option<String>,
    pub user_instructor: Option<Uuid>,
}

/// Page envelope returned by the course service. Only `content` is
/// mandatory.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemotePage<T> {
    content: Vec<T>,
    total_elements: Option<u64>,
}

#[derive(Debug, Error)]
#[error("Failed to initialize course service client")]
pub struct CourseClientInitError;

#[derive(Debug, Error)]
pub enum CourseLookupError {
    #[error("could not reach course service: {0}")]
    Transport(reqwest::Error),
    #[error("course service responded with {0}")]
    Server(StatusCode),
    #[error("course service rejected the request with {0}")]
    Client(StatusCode),
    #[error("could not decode course service response: {0}")]
    Decode(reqwest::Error),
}

impl CourseLookupError {
    /// Only a 4xx is final. Anything else, including a body that fails
    /// to decode, gets another try.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Client(..))
    }
}

#[derive(Debug, Clone)]
pub struct CourseClient {
    http: reqwest::Client,
    base_url: Url,
    retry: config::RetryPolicy,
}

impl CourseClient {
    pub fn new(cfg: &config::CourseService) -> Result<Self, CourseClientInitError> {
        let base_url = Url::parse(&cfg.base_url)
            .change_context(CourseClientInitError)
            .attach_printable("invalid course service base url")?;

        if base_url.cannot_be_a_base() {
            return Err(Report::new(CourseClientInitError)
                .attach_printable(format!("{base_url} cannot be used as a base url")));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(cfg.timeout())
            .timeout(cfg.timeout())
            .build()
            .change_context(CourseClientInitError)?;

        Ok(Self {
            http,
            base_url,
            retry: cfg.retry.clone(),
        })
    }

    #[must_use]
    pub fn courses_url(&self, user_id: Uuid, request: &PageRequest) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("courses");
        }

        url.query_pairs_mut()
            .append_pair("userId", &user_id.to_string())
            .append_pair("page", &request.page.to_string())
            .append_pair("size", &request.size.to_string())
            .append_pair("sort", &request.sort.to_string());

        url
    }

    /// Fetches the courses owned by a user.
    ///
    /// This never fails: once every attempt is spent the failure is
    /// logged and an empty page is returned, so "no courses" and
    /// "course service unreachable" look the same to the caller.
    #[tracing::instrument(skip(self, request), name = "courses.by_user")]
    pub async fn get_all_courses_by_user(
        &self,
        user_id: Uuid,
        request: &PageRequest,
    ) -> Page<CourseSummary> {
        match self.try_get_all_courses_by_user(user_id, request).await {
            Ok(page) => page,
            Err(error) => {
                tracing::error!(?error, "Inside retry fallback, returning no courses");
                Page::empty(request)
            }
        }
    }

    pub async fn try_get_all_courses_by_user(
        &self,
        user_id: Uuid,
        request: &PageRequest,
    ) -> Result<Page<CourseSummary>, RetryFailed> {
        let url = self.courses_url(user_id, request);
        tracing::info!(%url, "Request URL");

        let content = Retry::builder("courses.fetch", || self.fetch(url.clone()))
            .max_attempts(self.retry.max_attempts)
            .wait(self.retry.wait())
            .multiplier(self.retry.multiplier)
            .retry_if(CourseLookupError::is_retryable)
            .build()
            .run()
            .await?;

        tracing::debug!(elements = content.content.len(), "Response number of elements");
        tracing::info!(%user_id, "Ending request /courses");

        let total = content
            .total_elements
            .unwrap_or(content.content.len() as u64);

        Ok(Page::new(content.content, request, total))
    }

    async fn fetch(
        &self,
        url: Url,
    ) -> std::result::Result<RemotePage<CourseSummary>, CourseLookupError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(CourseLookupError::Transport)?;

        let status = response.status();
        if status.is_server_error() {
            return Err(CourseLookupError::Server(status));
        } else if !status.is_success() {
            return Err(CourseLookupError::Client(status));
        }

        response
            .json::<RemotePage<CourseSummary>>()
            .await
            .map_err(CourseLookupError::Decode)
    }
}
