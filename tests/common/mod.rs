#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use repo_report::error::FetchError;
use repo_report::github::RepoSource;
use repo_report::github::models::{
    Collaborator, Contributor, Permissions, PrState, PullRequest,
};

pub fn make_pr(number: u32, state: &str) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {number}"),
        state: PrState::from(state.to_string()),
        merged_at: None,
    }
}

pub fn make_merged_pr(number: u32) -> PullRequest {
    PullRequest {
        merged_at: Some(chrono::Utc::now()),
        ..make_pr(number, "closed")
    }
}

pub fn make_collaborator(login: &str, admin: bool) -> Collaborator {
    Collaborator {
        login: login.into(),
        permissions: Permissions {
            admin,
            pull: true,
            ..Permissions::default()
        },
    }
}

pub fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

/// In-memory source that counts every fetch it serves.
#[derive(Default)]
pub struct MockSource {
    pub pull_requests: Vec<PullRequest>,
    pub contributors: Vec<Contributor>,
    pub collaborators: Vec<Collaborator>,
    /// When set, the collaborators fetch fails with this HTTP status.
    pub fail_status: Option<u16>,
    pub calls: AtomicUsize,
}

impl MockSource {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RepoSource for MockSource {
    async fn fetch_pull_requests(&self) -> Result<Vec<PullRequest>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pull_requests.clone())
    }

    async fn fetch_contributors(&self) -> Result<Vec<Contributor>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.contributors.clone())
    }

    async fn fetch_collaborators(&self) -> Result<Vec<Collaborator>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.fail_status {
            return Err(FetchError::Status {
                url: "mock://collaborators".into(),
                status,
                status_text: "Not Found".into(),
            });
        }
        Ok(self.collaborators.clone())
    }
}
