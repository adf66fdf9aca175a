//! Fan-out/fan-in over projects: enumerate → scan each project concurrently → merge.
//!
//! # Responsibilities
//! - Bound the number of projects scanned at once with a semaphore
//!   (`concurrency`, clamped to at least 1)
//! - Run [`fetch_author_tally`] for every project in its own task
//! - Fold each finished project's tally into one [`SharedTally`]
//! - Wait for every launched task before reading the result
//!
//! # Error Handling
//! Failures are per project and never cancel other tasks: a project whose scan
//! fails is logged and contributes nothing. A failed enumeration yields an empty
//! report rather than an error.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::commits::fetch_author_tally;
use crate::config::{GitlabConfig, TallyConfig};
use crate::http::HttpClient;
use crate::projects::{list_projects, ProjectDescriptor};
use crate::tally::{AuthorTally, SharedTally};

/// Outcome of a full run.
#[derive(Debug, Clone, Default)]
pub struct TallyReport {
    /// Projects that passed the filter and were handed to the coordinator.
    pub projects: usize,
    /// Lower bound used for commit history, `YYYY-MM-DD`.
    pub since: String,
    pub tally: AuthorTally,
}

/// Scans every project with at most `concurrency` in flight and returns the
/// combined per-author tally of the projects that succeeded.
pub async fn tally_projects<C>(
    client: Arc<C>,
    gitlab: &GitlabConfig,
    projects: &[ProjectDescriptor],
    since: &str,
    concurrency: usize,
) -> AuthorTally
where
    C: HttpClient + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let combined = SharedTally::new();
    let mut handles = Vec::with_capacity(projects.len());

    for project in projects {
        // Acquire before spawning so at most `concurrency` tasks exist at once.
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                error!(
                    project = %project.name,
                    project_id = project.id,
                    error = %e,
                    "Failed to acquire semaphore; skipping project"
                );
                continue;
            }
        };

        let client = Arc::clone(&client);
        let gitlab = gitlab.clone();
        let since = since.to_string();
        let combined = combined.clone();
        let project = project.clone();

        handles.push(tokio::spawn(async move {
            let _permit = permit;
            info!(project = %project.name, project_id = project.id, "Processing project");
            match fetch_author_tally(client.as_ref(), &gitlab, project.id, &since).await {
                Ok(local) => {
                    combined.merge(&local).await;
                    info!(
                        project = %project.name,
                        project_id = project.id,
                        authors = local.len(),
                        "Merged project tally"
                    );
                }
                Err(e) => {
                    error!(
                        project = %project.name,
                        project_id = project.id,
                        error = %e,
                        "Skipping project due to errors"
                    );
                }
            }
        }));
    }

    info!(launched = handles.len(), "Waiting to finish all calculations");
    for joined in join_all(handles).await {
        if let Err(e) = joined {
            error!(error = %e, "Project task did not complete");
        }
    }

    combined.snapshot().await
}

/// Enumerates matching projects and tallies them. `today` anchors the
/// `since_days` window.
pub async fn run_tally<C>(client: Arc<C>, config: &TallyConfig, today: NaiveDate) -> TallyReport
where
    C: HttpClient + ?Sized + 'static,
{
    let since = config.since_date(today);
    info!(since = %since, "Starting tally run");

    let projects = match list_projects(client.as_ref(), &config.gitlab, &config.pattern).await {
        Ok(projects) => projects,
        Err(e) => {
            error!(error = %e, "Error fetching projects");
            Vec::new()
        }
    };

    let tally = tally_projects(
        client,
        &config.gitlab,
        &projects,
        &since,
        config.concurrency,
    )
    .await;

    TallyReport {
        projects: projects.len(),
        since,
        tally,
    }
}
