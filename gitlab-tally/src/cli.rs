//! CLI glue for gitlab-tally: argument parsing and the `run` entrypoint.
//!
//! All fetching and aggregation lives in `gitlab-tally-core`; this module loads
//! configuration, wires up the HTTP client and prints the report.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gitlab_tally_core::coordinator::run_tally;
use gitlab_tally_core::http::ReqwestClient;

use crate::load_config::load_config;
use crate::report::render_report;

/// CLI for gitlab-tally: sum changed lines per author across GitLab projects.
#[derive(Parser)]
#[clap(
    name = "gitlab-tally",
    version,
    about = "Sum added/removed lines per commit author across GitLab projects"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tally changed lines per author over every matching project
    Tally {
        /// Optional YAML file with non-secret settings; environment variables take precedence
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Tally { config } => {
            let config = load_config(config.as_deref())?;
            config.trace_loaded();

            let client = ReqwestClient::new(config.gitlab.request_timeout)
                .context("Failed to construct HTTP client")?;
            let today = chrono::Local::now().date_naive();
            let report = run_tally(Arc::new(client), &config, today).await;

            tracing::info!(
                command = "tally",
                projects = report.projects,
                authors = report.tally.len(),
                since = %report.since,
                "Tally complete"
            );
            print!("{}", render_report(&report.tally));
            Ok(())
        }
    }
}
