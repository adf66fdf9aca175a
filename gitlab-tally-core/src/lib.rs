#![doc = "gitlab-tally-core: core logic library for gitlab-tally."]

//! This crate walks a GitLab instance's projects, fetches commit history and
//! per-commit diff statistics, and sums changed lines per author.
//!
//! # Layout
//! - [`http`]: the single-request seam ([`http::HttpClient`]) and its reqwest implementation
//! - [`projects`]: project enumeration and name filtering
//! - [`commits`]: per-project commit and diff fetching
//! - [`tally`]: per-author totals and the shared run-wide accumulator
//! - [`coordinator`]: bounded concurrent fan-out over projects
//!
//! Configuration parsing and console output live in the `gitlab-tally` binary crate.

pub mod commits;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod pagination;
pub mod projects;
pub mod tally;
