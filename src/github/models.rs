use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrState {
    Open,
    Closed,
    /// Anything else the API reports, e.g. `merged` on some filters.
    Other(String),
}

impl From<String> for PrState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "open" => PrState::Open,
            "closed" => PrState::Closed,
            _ => PrState::Other(s),
        }
    }
}

impl From<PrState> for String {
    fn from(state: PrState) -> Self {
        match state {
            PrState::Open => "open".to_string(),
            PrState::Closed => "closed".to_string(),
            PrState::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub title: String,
    pub state: PrState,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    pub fn is_merged(&self) -> bool {
        match &self.state {
            PrState::Other(s) => s == "merged",
            PrState::Closed => self.merged_at.is_some(),
            PrState::Open => false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub maintain: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub triage: bool,
    #[serde(default)]
    pub pull: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaborator {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub permissions: Permissions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub contributions: u32,
}

/// Raw result sets of one run, all fetched before aggregation starts.
#[derive(Debug, Clone, Default)]
pub struct RepoData {
    pub pull_requests: Vec<PullRequest>,
    pub contributors: Vec<Contributor>,
    pub collaborators: Vec<Collaborator>,
}
