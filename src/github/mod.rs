pub mod auth;
pub mod endpoints;
pub mod models;
pub mod rest;

use std::future::Future;

use tracing::debug;

use crate::error::FetchError;

pub use models::*;
pub use rest::GithubClient;

/// Read access to the three result sets a report needs.
pub trait RepoSource {
    fn fetch_pull_requests(&self)
    -> impl Future<Output = Result<Vec<PullRequest>, FetchError>> + Send;

    fn fetch_contributors(&self)
    -> impl Future<Output = Result<Vec<Contributor>, FetchError>> + Send;

    fn fetch_collaborators(&self)
    -> impl Future<Output = Result<Vec<Collaborator>, FetchError>> + Send;
}

/// Issue all three fetches concurrently and wait for every result.
///
/// The first failure wins; the remaining requests are dropped.
pub async fn fetch_repo_data<S: RepoSource>(source: &S) -> Result<RepoData, FetchError> {
    let (pull_requests, contributors, collaborators) = tokio::try_join!(
        source.fetch_pull_requests(),
        source.fetch_contributors(),
        source.fetch_collaborators(),
    )?;

    debug!(
        pull_requests = pull_requests.len(),
        contributors = contributors.len(),
        collaborators = collaborators.len(),
        "Fetched repository data"
    );

    Ok(RepoData {
        pull_requests,
        contributors,
        collaborators,
    })
}
