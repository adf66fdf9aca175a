//! Project enumeration: walk `/projects` page by page and keep the ones whose
//! `name + path_with_namespace` matches the configured pattern.

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::GitlabConfig;
use crate::error::FetchError;
use crate::http::{auth_headers, HttpClient};
use crate::pagination::fetch_page;

/// A project as returned by the `simple=true` listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectDescriptor {
    pub id: u64,
    pub name: String,
    pub path_with_namespace: String,
}

impl ProjectDescriptor {
    /// The string the filter is matched against. Name and path are joined
    /// without a separator.
    pub fn match_key(&self) -> String {
        format!("{}{}", self.name, self.path_with_namespace)
    }
}

/// Compiled project-name filter.
///
/// An invalid pattern does not abort enumeration: it matches nothing, so every
/// project is dropped. This is surfaced once as a warning when the filter is built.
#[derive(Debug, Clone)]
pub struct ProjectFilter {
    regex: Option<Regex>,
}

impl ProjectFilter {
    pub fn new(pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => Self { regex: Some(regex) },
            Err(e) => {
                warn!(
                    pattern = %pattern,
                    error = %e,
                    "Invalid project filter pattern; no project will match"
                );
                Self { regex: None }
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    pub fn matches(&self, project: &ProjectDescriptor) -> bool {
        self.regex
            .as_ref()
            .is_some_and(|regex| regex.is_match(&project.match_key()))
    }
}

/// Lists every project visible to the token whose name+path matches `pattern`.
///
/// Results keep listing order. Any page failure aborts the whole enumeration.
pub async fn list_projects<C>(
    client: &C,
    gitlab: &GitlabConfig,
    pattern: &str,
) -> Result<Vec<ProjectDescriptor>, FetchError>
where
    C: HttpClient + ?Sized,
{
    let url = gitlab.api_url("projects");
    let headers = auth_headers(&gitlab.token);
    let filter = ProjectFilter::new(pattern);

    let mut matched = Vec::new();
    let mut page = 1;
    loop {
        let projects: Vec<ProjectDescriptor> =
            fetch_page(client, &url, &headers, page, &[("simple", "true")], "projects").await?;
        if projects.is_empty() {
            break;
        }
        let listed = projects.len();
        matched.extend(projects.into_iter().filter(|project| filter.matches(project)));
        debug!(page, listed, matched_so_far = matched.len(), "Scanned project page");
        page += 1;
    }

    info!(
        pages = page - 1,
        matched = matched.len(),
        pattern = %pattern,
        "Project enumeration complete"
    );
    Ok(matched)
}
