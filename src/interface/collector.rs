use crate::{CollectionSummary, RepositoryFormatter, StdResult};

/// A trait for walking all the repositories of an account and handing them to a formatter.
#[async_trait::async_trait]
pub trait RepositoryCollector: Sync + Send {
    /// Collects the repositories of the account, batch by batch.
    ///
    /// Page failures are reported in the summary, not as an error.
    async fn collect(
        &self,
        account: &str,
        formatter: &mut dyn RepositoryFormatter,
    ) -> StdResult<CollectionSummary>;
}
