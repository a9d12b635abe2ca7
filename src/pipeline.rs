use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::ReportError;
use crate::github::{self, RepoSource, endpoints};
use crate::report::{self, ReportContext, ReportSettings, RepoMetrics};
use crate::util::config::RepoTarget;

/// Steps of a run, in order. A run either reaches `Written` or stops at the
/// first failing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetched,
    Aggregated,
    Rendered,
    Written,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetched => "fetched",
            Stage::Aggregated => "aggregated",
            Stage::Rendered => "rendered",
            Stage::Written => "written",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub metrics: RepoMetrics,
    pub pull_requests: usize,
    pub contributors: usize,
    pub output: PathBuf,
}

/// Fetch, aggregate, render and write one report.
///
/// Nothing touches the filesystem unless every fetch succeeded.
pub async fn run<S: RepoSource>(
    source: &S,
    target: &RepoTarget,
    settings: &ReportSettings,
    generated_at: Option<DateTime<Utc>>,
) -> Result<RunSummary, ReportError> {
    let data = github::fetch_repo_data(source).await?;
    debug!(stage = %Stage::Fetched, repo = %target.full_name());

    let metrics = report::aggregate(&data.pull_requests, &data.collaborators, settings.merged_as);
    debug!(stage = %Stage::Aggregated, ?metrics);

    let ctx = ReportContext {
        repo_name: target.full_name(),
        repo_url: settings
            .link_repository
            .then(|| endpoints::html_url(target.owner(), target.repo())),
        style: settings.style,
        generated_at,
    };
    let html = report::render(&metrics, &ctx);
    debug!(stage = %Stage::Rendered, bytes = html.len());

    report::write_report(&settings.output, &html)?;
    debug!(stage = %Stage::Written, path = %settings.output.display());

    Ok(RunSummary {
        metrics,
        pull_requests: data.pull_requests.len(),
        contributors: data.contributors.len(),
        output: settings.output.clone(),
    })
}
