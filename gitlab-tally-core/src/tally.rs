//! Per-author line-change totals.
//!
//! [`AuthorTally`] is owned by one project while it is being scanned. The run-wide
//! total lives in a [`SharedTally`], the only state shared between project tasks.

use std::collections::btree_map::{self, BTreeMap};
use std::ops::{Add, AddAssign};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::commits::DiffStatistics;

/// Added, removed and total changed lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCounts {
    pub added: u64,
    pub removed: u64,
    /// As reported by GitLab; not required to equal `added + removed`.
    pub total: u64,
}

impl LineCounts {
    pub fn new(added: u64, removed: u64, total: u64) -> Self {
        Self {
            added,
            removed,
            total,
        }
    }
}

impl Add for LineCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            added: self.added + rhs.added,
            removed: self.removed + rhs.removed,
            total: self.total + rhs.total,
        }
    }
}

impl AddAssign for LineCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl From<&DiffStatistics> for LineCounts {
    fn from(stats: &DiffStatistics) -> Self {
        Self::new(stats.additions, stats.deletions, stats.total)
    }
}

/// Author email (case-sensitive, as reported) to summed [`LineCounts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorTally {
    authors: BTreeMap<String, LineCounts>,
}

impl AuthorTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one commit's statistics to `author`, starting from zero on first sight.
    pub fn record(&mut self, author: &str, stats: &DiffStatistics) {
        self.add(author, LineCounts::from(stats));
    }

    fn add(&mut self, author: &str, counts: LineCounts) {
        match self.authors.get_mut(author) {
            Some(existing) => *existing += counts,
            None => {
                self.authors.insert(author.to_string(), counts);
            }
        }
    }

    /// Folds `other` into `self`, one author at a time.
    pub fn merge(&mut self, other: &AuthorTally) {
        for (author, counts) in &other.authors {
            self.add(author, *counts);
        }
    }

    pub fn get(&self, author: &str) -> Option<&LineCounts> {
        self.authors.get(author)
    }

    /// Authors in email order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, LineCounts> {
        self.authors.iter()
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    /// Grand totals across every author.
    pub fn totals(&self) -> LineCounts {
        self.authors
            .values()
            .fold(LineCounts::default(), |acc, counts| acc + *counts)
    }
}

impl<'a> IntoIterator for &'a AuthorTally {
    type Item = (&'a String, &'a LineCounts);
    type IntoIter = btree_map::Iter<'a, String, LineCounts>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Run-wide accumulator. Clones share the same underlying tally.
///
/// The lock is held only while a finished project's tally is folded in.
#[derive(Debug, Clone, Default)]
pub struct SharedTally {
    inner: Arc<Mutex<AuthorTally>>,
}

impl SharedTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn merge(&self, local: &AuthorTally) {
        let mut combined = self.inner.lock().await;
        combined.merge(local);
    }

    pub async fn snapshot(&self) -> AuthorTally {
        self.inner.lock().await.clone()
    }
}
