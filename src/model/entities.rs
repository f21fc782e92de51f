use std::{fmt::Display, ops::Deref};

use serde::{Deserialize, Serialize};

use super::PageFailure;

/// The name of a repository.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(pub String);

impl Deref for RepositoryName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative counter reported by the API (forks, stars, watchers).
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Counter(pub u32);

impl Counter {
    /// Returns `true` when the counter is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl Deref for Counter {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata of a GitHub repository, as returned by the repositories listing endpoint.
///
/// Unknown fields of the payload are ignored.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// The name of the repository.
    name: RepositoryName,

    /// The number of forks of the repository.
    forks_count: Counter,

    /// The number of stars of the repository.
    stargazers_count: Counter,

    /// The number of watchers of the repository.
    watchers_count: Counter,

    /// Whether the repository is itself a fork.
    #[serde(skip_serializing)]
    fork: bool,
}

impl Repository {
    /// Creates a new `Repository` instance.
    pub fn new(name: &str, forks: u32, stars: u32, watchers: u32, fork: bool) -> Self {
        Self {
            name: RepositoryName(name.to_string()),
            forks_count: Counter(forks),
            stargazers_count: Counter(stars),
            watchers_count: Counter(watchers),
            fork,
        }
    }

    /// Retrieves the repository name.
    pub fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// Retrieves the number of forks.
    pub fn forks_count(&self) -> Counter {
        self.forks_count
    }

    /// Retrieves the number of stars.
    pub fn stargazers_count(&self) -> Counter {
        self.stargazers_count
    }

    /// Retrieves the number of watchers.
    pub fn watchers_count(&self) -> Counter {
        self.watchers_count
    }

    /// Returns `true` if the repository is a fork of another one.
    pub fn is_fork(&self) -> bool {
        self.fork
    }

    /// Creates a dummy repository for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy(name: &str) -> Self {
        Self::new(name, 1, 2, 3, false)
    }
}

impl Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repository: {}, Forks: {}, Stars: {}, Watchers: {}, Fork: {}",
            self.name, self.forks_count, self.stargazers_count, self.watchers_count, self.fork
        )
    }
}

/// What a collection run went through.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    /// The number of pages requested from the fetcher, including the terminating one.
    pub pages_requested: u32,

    /// The number of non-empty batches handed to the formatter.
    pub batches: u32,

    /// The total number of repositories received, forks included.
    pub repositories: u32,

    /// The page failure that stopped the collection, if any.
    pub failure: Option<PageFailure>,
}

impl CollectionSummary {
    /// Returns `true` when the collection reached the end of the listing.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

impl Display for CollectionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pages: requested={}, Batches: {}, Repositories: {}, complete={}",
            self.pages_requested,
            self.batches,
            self.repositories,
            self.is_complete()
        )
    }
}
