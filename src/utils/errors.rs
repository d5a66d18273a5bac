use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    HttpRequestError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("'{expression}' is not a valid regular expression: {source}")]
    InvalidExpression {
        expression: String,
        #[source]
        source: regex::Error,
    },

    #[error("'{expression}' needs at least {expected} capture group(s)")]
    MissingCaptureGroup { expression: String, expected: usize },

    #[error("Could not extract movie info from '{0}' with any of the configured expressions")]
    Unparsable(String),

    #[error("Movie API error: {0}")]
    ApiError(String),

    #[error("Other error: {0}")]
    Other(String),
}
