use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::ConfigError;
use crate::github::auth;
use crate::report::{MergedPolicy, ReportSettings, ReportStyle};

pub const OWNER_ENV: &str = "REPO_USER_NAME";
pub const REPO_ENV: &str = "REPO_NAME";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Default owner, used when neither `--owner` nor `REPO_USER_NAME` is given.
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub style: ReportStyle,
    #[serde(default)]
    pub merged_as: MergedPolicy,
    #[serde(default = "default_true")]
    pub link_repository: bool,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_output() -> PathBuf {
    PathBuf::from("repo-data-report.html")
}
fn default_true() -> bool {
    true
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            owner: None,
            repo: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            style: ReportStyle::default(),
            merged_as: MergedPolicy::default(),
            link_repository: true,
        }
    }
}

/// Values given explicitly on the command line. They win over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub output: Option<PathBuf>,
    pub style: Option<ReportStyle>,
    pub merged_as: Option<MergedPolicy>,
}

/// An `owner/repo` pair whose parts are safe to use as URL path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTarget {
    owner: String,
    repo: String,
}

impl RepoTarget {
    pub fn new(owner: &str, repo: &str) -> Result<Self, ConfigError> {
        for name in [owner, repo] {
            if !is_valid_name(name) {
                return Err(ConfigError::InvalidRepository(name.to_string()));
            }
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// GitHub account and repository names: ASCII alphanumerics, `.`, `_`, `-`,
/// and never a bare `.` or `..`.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[derive(Debug, Clone)]
pub struct GithubSettings {
    pub token: String,
    pub api_url: String,
    pub timeout: Duration,
}

/// Fully resolved configuration of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub github: GithubSettings,
    pub target: RepoTarget,
    pub report: ReportSettings,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_file(path);
        }

        let mut candidates = Vec::new();

        // 1. ~/.config/repo-report/config.toml
        if let Some(home) = std::env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join(".config/repo-report/config.toml"));
        }

        // 2. Platform-specific path from `directories`
        if let Some(proj_dirs) = ProjectDirs::from("", "", "repo-report") {
            candidates.push(proj_dirs.config_dir().join("config.toml"));
        }

        for config_path in &candidates {
            if config_path.exists() {
                return Self::load_file(config_path);
            }
        }

        Ok(AppConfig::default())
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Layer CLI overrides, then the environment, then this file config.
    ///
    /// The token is checked first so a missing credential fails before
    /// anything else is looked at.
    pub fn resolve<F>(
        &self,
        overrides: &ConfigOverrides,
        lookup: F,
    ) -> Result<RunConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = auth::resolve_token(&lookup)?;

        let owner = pick(&overrides.owner, lookup(OWNER_ENV), &self.github.owner);
        let repo = pick(&overrides.repo, lookup(REPO_ENV), &self.github.repo);
        let (Some(owner), Some(repo)) = (owner, repo) else {
            return Err(ConfigError::MissingRepository);
        };
        let target = RepoTarget::new(&owner, &repo)?;

        let api_url = overrides
            .api_url
            .clone()
            .unwrap_or_else(|| self.github.api_url.clone());
        validate_api_url(&api_url)?;

        let timeout_secs = overrides.timeout_secs.unwrap_or(self.github.timeout_secs).max(1);

        Ok(RunConfig {
            github: GithubSettings {
                token,
                api_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            target,
            report: ReportSettings {
                output: overrides
                    .output
                    .clone()
                    .unwrap_or_else(|| self.report.output.clone()),
                style: overrides.style.unwrap_or(self.report.style),
                merged_as: overrides.merged_as.unwrap_or(self.report.merged_as),
                link_repository: self.report.link_repository,
            },
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "repo-report") {
            return proj_dirs.data_dir().join("logs");
        }
        PathBuf::from(".local/share/repo-report/logs")
    }
}

fn pick(cli: &Option<String>, env: Option<String>, file: &Option<String>) -> Option<String> {
    [cli.clone(), env, file.clone()]
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

fn validate_api_url(api_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(api_url).map_err(|e| ConfigError::MalformedApiUrl {
        url: api_url.to_string(),
        reason: e.to_string(),
    })?;
    let loopback = matches!(
        url.host_str(),
        Some("localhost") | Some("127.0.0.1") | Some("[::1]")
    );
    if url.scheme() == "https" || (url.scheme() == "http" && loopback) {
        Ok(())
    } else {
        Err(ConfigError::InvalidApiUrl(api_url.to_string()))
    }
}
