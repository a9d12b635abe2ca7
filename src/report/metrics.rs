use super::MergedPolicy;
use crate::github::models::{Collaborator, PrState, PullRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepoMetrics {
    pub open_prs: usize,
    pub closed_prs: usize,
    /// Collaborator count. Contributors never feed this number.
    pub total_users: usize,
    pub admin_users: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Open,
    Closed,
    Skip,
}

fn classify(pr: &PullRequest, policy: MergedPolicy) -> Bucket {
    if pr.is_merged() {
        match policy {
            MergedPolicy::Closed => return Bucket::Closed,
            MergedPolicy::Open => return Bucket::Open,
            MergedPolicy::Excluded => return Bucket::Skip,
            MergedPolicy::AsReported => {}
        }
    }

    match pr.state {
        PrState::Open => Bucket::Open,
        PrState::Closed => Bucket::Closed,
        PrState::Other(_) => Bucket::Skip,
    }
}

/// Reduce the raw result sets of one run to the report's four counters.
pub fn aggregate(
    pull_requests: &[PullRequest],
    collaborators: &[Collaborator],
    merged_as: MergedPolicy,
) -> RepoMetrics {
    let mut metrics = RepoMetrics::default();

    for pr in pull_requests {
        match classify(pr, merged_as) {
            Bucket::Open => metrics.open_prs += 1,
            Bucket::Closed => metrics.closed_prs += 1,
            Bucket::Skip => {}
        }
    }

    metrics.total_users = collaborators.len();
    metrics.admin_users = collaborators
        .iter()
        .filter(|c| c.permissions.admin)
        .count();

    metrics
}
