use crate::types;
use error_stack::{Context, Report};
use thiserror::Error;
use tracing_error::SpanTrace;

mod impls;

pub type Result<T> = std::result::Result<T, Error>;

/// Erased context of every [`Error`] report. The original context
/// stays visible in the report's frames.
#[derive(Debug, Error)]
#[error("Failed to perform request")]
pub struct RequestFailed;

pub struct Error {
    error_type: types::Error,
    report: Report<RequestFailed>,
    trace: SpanTrace,
}

impl Error {
    #[must_use]
    pub fn new(error_type: types::Error) -> Self {
        Self::from_report(error_type, Report::new(RequestFailed))
    }

    #[must_use]
    pub fn from_context(error_type: types::Error, context: impl Context) -> Self {
        Self::from_report(error_type, Report::new(context))
    }

    #[must_use]
    pub fn from_report(error_type: types::Error, report: Report<impl Context>) -> Self {
        Self {
            error_type,
            report: report.change_context(RequestFailed),
            trace: SpanTrace::capture(),
        }
    }
}

impl Error {
    #[must_use]
    pub fn downcast_ref<F: Context>(&self) -> Option<&F> {
        self.report.downcast_ref::<F>()
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("type", &self.error_type)
            .field("report", &self.report)
            .field("trace", &self.trace)
            .finish()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", &self.error_type)?;
        writeln!(f, "{:?}", self.report)?;
        std::fmt::Display::fmt(&self.trace, f)
    }
}
