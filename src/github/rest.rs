use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::RepoSource;
use super::endpoints;
use super::models::*;
use crate::error::FetchError;
use crate::util::config::{GithubSettings, RepoTarget};

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    token: String,
    target: RepoTarget,
}

impl GithubClient {
    pub fn new(settings: &GithubSettings, target: &RepoTarget) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent("repo-report")
            .timeout(settings.timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
            target: target.clone(),
        })
    }

    /// GET `endpoint` relative to the API root and return the JSON body as is.
    pub async fn fetch_data(&self, endpoint: &str) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.api_url, endpoint);
        debug!(url = %url, "GET");

        let resp = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, endpoints::ACCEPT_V3)
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = resp.bytes().await.map_err(|e| request_error(&url, e))?;
        // Contributors of an empty repository come back as 204 with no body.
        if body.is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
    }

    async fn fetch_list<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>, FetchError> {
        let data = self.fetch_data(endpoint).await?;
        serde_json::from_value(data).map_err(|source| FetchError::Decode {
            url: format!("{}{}", self.api_url, endpoint),
            source,
        })
    }
}

fn request_error(url: &str, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            source,
        }
    }
}

impl RepoSource for GithubClient {
    async fn fetch_pull_requests(&self) -> Result<Vec<PullRequest>, FetchError> {
        let prs: Vec<PullRequest> = self
            .fetch_list(&endpoints::pull_requests(self.target.owner(), self.target.repo()))
            .await?;
        debug!(count = prs.len(), "Fetched pull requests");
        Ok(prs)
    }

    async fn fetch_contributors(&self) -> Result<Vec<Contributor>, FetchError> {
        let contributors: Vec<Contributor> = self
            .fetch_list(&endpoints::contributors(self.target.owner(), self.target.repo()))
            .await?;
        debug!(count = contributors.len(), "Fetched contributors");
        Ok(contributors)
    }

    async fn fetch_collaborators(&self) -> Result<Vec<Collaborator>, FetchError> {
        let collaborators: Vec<Collaborator> = self
            .fetch_list(&endpoints::collaborators(self.target.owner(), self.target.repo()))
            .await?;
        debug!(count = collaborators.len(), "Fetched collaborators");
        Ok(collaborators)
    }
}
