use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Logging {
    /// Filter directives in the `RUST_LOG` syntax. `RUST_LOG` takes
    /// over when this is not set.
    ///
    /// **Environment variables**:
    /// - `AUTHUSER_LOGGING_TARGETS`
    pub targets: Option<String>,
    /// **Environment variables**:
    /// - `AUTHUSER_LOGGING_STYLE`
    #[serde(default)]
    pub style: LoggingStyle,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingStyle {
    Compact,
    #[default]
    Full,
    Pretty,
    Json,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            targets: None,
            style: LoggingStyle::Full,
        }
    }
}
