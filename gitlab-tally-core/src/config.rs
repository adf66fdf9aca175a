use std::time::Duration;

use chrono::{Days, NaiveDate};
use tracing::{debug, info};

pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";
pub const DEFAULT_SINCE_DAYS: u32 = 360;
pub const DEFAULT_CONCURRENCY: usize = 20;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Where to reach GitLab and how to authenticate.
#[derive(Clone)]
pub struct GitlabConfig {
    pub base_url: String,
    pub token: String,
    /// `None` lets a request block indefinitely.
    pub request_timeout: Option<Duration>,
}

impl GitlabConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for GitlabConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitlabConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Everything one tally run needs.
#[derive(Debug, Clone)]
pub struct TallyConfig {
    pub gitlab: GitlabConfig,
    /// Regex over `name + path_with_namespace`; empty matches every project.
    pub pattern: String,
    pub since_days: u32,
    pub concurrency: usize,
}

impl TallyConfig {
    pub fn new(gitlab: GitlabConfig) -> Self {
        Self {
            gitlab,
            pattern: String::new(),
            since_days: DEFAULT_SINCE_DAYS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Lower bound for commit history as `YYYY-MM-DD`, counted back from `today`.
    pub fn since_date(&self, today: NaiveDate) -> String {
        today
            .checked_sub_days(Days::new(u64::from(self.since_days)))
            .unwrap_or(NaiveDate::MIN)
            .format("%Y-%m-%d")
            .to_string()
    }

    pub fn trace_loaded(&self) {
        info!(
            gitlab_url = %self.gitlab.base_url,
            token_len = self.gitlab.token.len(),
            pattern = %self.pattern,
            since_days = self.since_days,
            concurrency = self.concurrency,
            request_timeout = ?self.gitlab.request_timeout,
            "Loaded TallyConfig"
        );
        debug!(?self, "TallyConfig loaded (full debug)");
    }
}
