//! In-memory stand-in for a GitLab instance, keyed by exact request URL.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use gitlab_tally_core::error::HttpError;
use gitlab_tally_core::http::HttpClient;
use serde_json::json;

pub const BASE: &str = "https://gitlab.test";
pub const SINCE: &str = "2024-01-01";

enum Route {
    Body(String),
    Status(u16),
}

#[derive(Default)]
pub struct FakeGitlab {
    routes: HashMap<String, Route>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl FakeGitlab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request sleeps this long, so overlapping projects overlap in time.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn route(&mut self, url: impl Into<String>, body: impl Into<String>) {
        self.routes.insert(url.into(), Route::Body(body.into()));
    }

    pub fn fail(&mut self, url: impl Into<String>, status: u16) {
        self.routes.insert(url.into(), Route::Status(status));
    }

    /// One full page of projects followed by an empty page.
    pub fn projects(&mut self, projects: &[(u64, &str, &str)]) {
        let page: Vec<_> = projects
            .iter()
            .map(|(id, name, path)| json!({"id": id, "name": name, "path_with_namespace": path}))
            .collect();
        self.route(projects_page(1), json!(page).to_string());
        self.route(projects_page(2), "[]");
    }

    /// One page of commits for `project_id` (since [`SINCE`]) plus the per-commit
    /// stats endpoints, followed by an empty page.
    pub fn commits(&mut self, project_id: u64, commits: &[(&str, &str, (u64, u64, u64))]) {
        let page: Vec<_> = commits
            .iter()
            .map(|(sha, email, _)| json!({"id": sha, "author_email": email}))
            .collect();
        self.route(commits_page(project_id, 1), json!(page).to_string());
        self.route(commits_page(project_id, 2), "[]");
        for (sha, _, (additions, deletions, total)) in commits {
            self.route(
                commit_url(project_id, sha),
                json!({"id": sha, "stats": {"additions": additions, "deletions": deletions, "total": total}})
                    .to_string(),
            );
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for FakeGitlab {
    async fn request(
        &self,
        _method: &str,
        url: &str,
        _headers: &[(String, String)],
    ) -> Result<Vec<u8>, HttpError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = match self.routes.get(url) {
            Some(Route::Body(body)) => Ok(body.clone().into_bytes()),
            Some(Route::Status(status)) => Err(HttpError::UnexpectedStatus {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(HttpError::UnexpectedStatus {
                url: url.to_string(),
                status: 404,
            }),
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn projects_page(page: u32) -> String {
    format!("{BASE}/api/v4/projects?per_page=100&page={page}&simple=true")
}

pub fn commits_page(project_id: u64, page: u32) -> String {
    format!("{BASE}/api/v4/projects/{project_id}/repository/commits?per_page=100&page={page}&since={SINCE}")
}

pub fn commit_url(project_id: u64, sha: &str) -> String {
    format!("{BASE}/api/v4/projects/{project_id}/repository/commits/{sha}")
}
