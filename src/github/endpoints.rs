pub const ACCEPT_V3: &str = "application/vnd.github.v3+json";

pub fn pull_requests(owner: &str, repo: &str) -> String {
    format!("/repos/{owner}/{repo}/pulls?state=all")
}

pub fn contributors(owner: &str, repo: &str) -> String {
    format!("/repos/{owner}/{repo}/contributors")
}

pub fn collaborators(owner: &str, repo: &str) -> String {
    format!("/repos/{owner}/{repo}/collaborators?affiliation=all")
}

/// Browser URL of the repository, used for the report's back link.
pub fn html_url(owner: &str, repo: &str) -> String {
    format!("https://github.com/{owner}/{repo}")
}
