use std::path::PathBuf;

use thiserror::Error;

/// Raised while resolving the run configuration, before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOKEN_GITHUB is not set")]
    MissingToken,

    #[error(
        "repository owner and name are required: pass --owner/--repo, \
         set REPO_USER_NAME/REPO_NAME, or add them to the [github] config section"
    )]
    MissingRepository,

    #[error("invalid repository owner or name: {0:?}")]
    InvalidRepository(String),

    #[error("GitHub API URL must use HTTPS: {0}")]
    InvalidApiUrl(String),

    #[error("GitHub API URL is not a valid URL: {url}: {reason}")]
    MalformedApiUrl { url: String, reason: String },

    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("failed to fetch {url}: {status} {status_text}")]
    Status {
        url: String,
        status: u16,
        status_text: String,
    },

    #[error("failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Any failure inside the fetch/aggregate/render/write pipeline.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("error fetching data")]
    Fetch(#[from] FetchError),

    #[error("failed to write report to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
