use std::fmt::Display;

use super::{FetchError, PageRequest, Repository};

/// A page fetch that failed, with the account and page it was made for.
#[derive(Debug, PartialEq, Eq)]
pub struct PageFailure {
    /// The account whose repositories were requested.
    pub(crate) account: String,

    /// The page that could not be fetched.
    pub(crate) page: u32,

    /// The underlying fetch error.
    pub(crate) error: FetchError,
}

impl PageFailure {
    /// Creates a new `PageFailure` for the given request.
    pub fn new(request: &PageRequest, error: FetchError) -> Self {
        Self {
            account: request.account.clone(),
            page: request.page,
            error,
        }
    }

    /// Retrieves the account.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Retrieves the page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Retrieves the fetch error.
    pub fn error(&self) -> &FetchError {
        &self.error
    }
}

impl Display for PageFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to fetch page {} of repositories for account {}: {}",
            self.page, self.account, self.error
        )
    }
}

impl std::error::Error for PageFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// The outcome of fetching one page.
#[derive(Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The repositories of the page, possibly none.
    Batch(Vec<Repository>),

    /// The page could not be fetched.
    Failure(PageFailure),
}

impl FetchOutcome {
    /// Wraps the result of a fetch for the given request.
    pub fn from_result(request: &PageRequest, result: Result<Vec<Repository>, FetchError>) -> Self {
        match result {
            Ok(repositories) => FetchOutcome::Batch(repositories),
            Err(error) => FetchOutcome::Failure(PageFailure::new(request, error)),
        }
    }
}
