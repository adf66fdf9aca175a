//! Commit & diff fetcher for a single project.
//!
//! Listing pages are all-or-nothing: a failed or unparsable page aborts the
//! project. A failed or unparsable diff for one commit is logged and that commit
//! is left out of the tally.

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::GitlabConfig;
use crate::error::FetchError;
use crate::http::{auth_headers, HttpClient};
use crate::pagination::fetch_page;
use crate::tally::AuthorTally;

/// One entry of the commit listing. Only used to look up the commit's stats.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitDescriptor {
    pub id: String,
    #[serde(default)]
    pub author_email: String,
}

/// Line-change statistics GitLab reports for one commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DiffStatistics {
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Deserialize)]
struct CommitDetail {
    #[serde(default)]
    stats: DiffStatistics,
}

fn commits_url(gitlab: &GitlabConfig, project_id: u64) -> String {
    gitlab.api_url(&format!("projects/{project_id}/repository/commits"))
}

/// Fetches the diff statistics of a single commit.
pub async fn fetch_commit_stats<C>(
    client: &C,
    gitlab: &GitlabConfig,
    project_id: u64,
    commit_id: &str,
) -> Result<DiffStatistics, FetchError>
where
    C: HttpClient + ?Sized,
{
    let url = format!("{}/{}", commits_url(gitlab, project_id), commit_id);
    let body = client
        .request("GET", &url, &auth_headers(&gitlab.token))
        .await
        .map_err(|source| FetchError::Request {
            url: url.clone(),
            source,
        })?;
    let detail: CommitDetail =
        serde_json::from_slice(&body).map_err(|source| FetchError::Parse {
            what: "commit stats",
            url,
            source,
        })?;
    Ok(detail.stats)
}

/// Sums diff statistics per author for every commit of `project_id` at or after
/// `since` (`YYYY-MM-DD`; empty means the whole history).
pub async fn fetch_author_tally<C>(
    client: &C,
    gitlab: &GitlabConfig,
    project_id: u64,
    since: &str,
) -> Result<AuthorTally, FetchError>
where
    C: HttpClient + ?Sized,
{
    let url = commits_url(gitlab, project_id);
    let headers = auth_headers(&gitlab.token);
    let query: Vec<(&str, &str)> = if since.is_empty() {
        Vec::new()
    } else {
        vec![("since", since)]
    };

    let mut tally = AuthorTally::new();
    let mut page = 1;
    let mut skipped = 0usize;
    loop {
        let commits: Vec<CommitDescriptor> =
            fetch_page(client, &url, &headers, page, &query, "commits").await?;
        if commits.is_empty() {
            break;
        }
        debug!(project_id, page, commits = commits.len(), "Fetched commit page");

        for commit in commits {
            match fetch_commit_stats(client, gitlab, project_id, &commit.id).await {
                Ok(stats) => tally.record(&commit.author_email, &stats),
                Err(e) => {
                    skipped += 1;
                    warn!(
                        project_id,
                        commit = %commit.id,
                        error = %e,
                        "Error getting diff for commit; skipping"
                    );
                }
            }
        }
        page += 1;
    }

    info!(
        project_id,
        authors = tally.len(),
        skipped_commits = skipped,
        "Commit scan complete"
    );
    Ok(tally)
}
