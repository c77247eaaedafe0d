use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    EnvVar(#[from] EnvVarError),

    #[error("JSON deserialization error: {0}")]
    JSON(#[from] JSONError),

    #[error("{0} required")]
    Validation(&'static str),

    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error("Expected JSON from Lichess API but received: {}", describe_content(.excerpt, .content_type))]
    ContentType {
        content_type: String,
        excerpt: String,
    },

    #[error("Lichess leaderboards returned non-JSON responses: {0}")]
    LeaderboardsExhausted(String),

    #[error("invalid base URL {url}: {reason}")]
    BaseUrl { url: String, reason: String },
}

fn describe_content<'a>(excerpt: &'a str, content_type: &'a str) -> &'a str {
    if excerpt.is_empty() {
        content_type
    } else {
        excerpt
    }
}

#[derive(thiserror::Error, Debug)]
#[error("{source} ({var})")]
pub struct EnvVarError {
    var: String,
    #[source]
    source: std::env::VarError,
}

impl EnvVarError {
    pub fn new(var: &str, source: std::env::VarError) -> Self {
        Self {
            var: var.into(),
            source,
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("{source} ({url})")]
pub struct JSONError {
    url: String,
    #[source]
    source: serde_json::Error,
}

impl JSONError {
    pub fn new(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self {
            url: url.into(),
            source,
        }
    }
}
