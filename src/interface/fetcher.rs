use crate::{FetchError, PageRequest, Repository};

/// A trait for fetching one page of repositories from the API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryFetcher: Sync + Send {
    /// Fetches the repositories of the requested page, an empty page marks the end of the listing.
    async fn fetch(&self, request: &PageRequest) -> Result<Vec<Repository>, FetchError>;
}
