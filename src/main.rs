use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use repo_report::github::GithubClient;
use repo_report::pipeline;
use repo_report::report::{MergedPolicy, ReportStyle};
use repo_report::util::config::{AppConfig, ConfigOverrides};

const EXIT_FAILURE: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "repo-report",
    version,
    about = "Render an HTML summary of a GitHub repository's pull requests and collaborators"
)]
struct Cli {
    /// Repository owner (overrides REPO_USER_NAME)
    #[arg(long)]
    owner: Option<String>,

    /// Repository name (overrides REPO_NAME)
    #[arg(long)]
    repo: Option<String>,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report layout
    #[arg(long, value_enum)]
    style: Option<ReportStyle>,

    /// How merged pull requests are counted
    #[arg(long, value_enum)]
    merged_as: Option<MergedPolicy>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// GitHub REST API root
    #[arg(long)]
    api_url: Option<String>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging, also to a file
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", error_chain(&e));
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    // Dropped on return so the debug log file is flushed on every exit path.
    let _guard = match setup_logging(&config, cli.debug) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Failed to set up logging: {e:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let overrides = ConfigOverrides {
        owner: cli.owner,
        repo: cli.repo,
        api_url: cli.api_url,
        timeout_secs: cli.timeout_secs,
        output: cli.output,
        style: cli.style,
        merged_as: cli.merged_as,
    };

    let run_config = match config.resolve(&overrides, |key| std::env::var(key).ok()) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", error_chain(&e));
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    info!(repo = %run_config.target.full_name(), "repo-report starting");

    let client = match GithubClient::new(&run_config.github, &run_config.target) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", error_chain(&e));
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match pipeline::run(
        &client,
        &run_config.target,
        &run_config.report,
        Some(chrono::Utc::now()),
    )
    .await
    {
        Ok(summary) => {
            info!(
                open_prs = summary.metrics.open_prs,
                closed_prs = summary.metrics.closed_prs,
                total_users = summary.metrics.total_users,
                admin_users = summary.metrics.admin_users,
                contributors = summary.contributors,
                path = %summary.output.display(),
                "Report generated successfully"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", error_chain(&e));
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Join an error with its sources: "outer: inner: root".
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        msg.push_str(": ");
        msg.push_str(&s.to_string());
        source = s.source();
    }
    msg
}

fn setup_logging(
    config: &AppConfig,
    debug: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let default_filter = if debug {
        "repo_report=debug"
    } else {
        "repo_report=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter);

    if !debug {
        tracing_subscriber::registry().with(stderr_layer).init();
        return Ok(None);
    }

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "repo-report.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(EnvFilter::new("repo_report=debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(Some(guard))
}
