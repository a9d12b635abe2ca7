pub mod html;
pub mod metrics;
pub mod writer;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use html::{ReportContext, render};
pub use metrics::{RepoMetrics, aggregate};
pub use writer::write_report;

/// How a merged pull request is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MergedPolicy {
    /// Count by the reported `state` only; anything but `open`/`closed` is skipped.
    #[default]
    AsReported,
    Closed,
    Open,
    Excluded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportStyle {
    /// Bare bordered table.
    Plain,
    /// Table with embedded CSS.
    #[default]
    Styled,
}

#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub output: PathBuf,
    pub style: ReportStyle,
    pub merged_as: MergedPolicy,
    pub link_repository: bool,
}
