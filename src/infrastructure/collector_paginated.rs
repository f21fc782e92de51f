use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::mpsc;

use crate::{
    CollectionSummary, DEFAULT_PAGE_SIZE, FetchOutcome, PageFailure, PageRequest, Repository,
    RepositoryCollector, RepositoryFetcher, RepositoryFormatter, StdResult,
};

/// The number of messages a channel holds before the producer suspends.
///
/// Tokio channels can not be unbuffered, one slot is the closest to a rendezvous.
const CHANNEL_CAPACITY: usize = 1;

/// A collector that walks the pages of an account in a background task while the
/// caller formats the batches as they arrive.
pub struct PaginatedCollector {
    fetcher: Arc<dyn RepositoryFetcher>,
    page_size: u16,
}

impl PaginatedCollector {
    /// Creates a new `PaginatedCollector` instance with the given fetcher.
    pub fn new(fetcher: Arc<dyn RepositoryFetcher>) -> Self {
        Self {
            fetcher,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the number of repositories requested per page.
    pub fn with_page_size(mut self, page_size: u16) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Fetches consecutive pages until an empty page or the first failure.
///
/// Returns the number of pages requested.
async fn produce_pages(
    fetcher: Arc<dyn RepositoryFetcher>,
    first_request: PageRequest,
    batches: mpsc::Sender<Vec<Repository>>,
    failures: mpsc::Sender<PageFailure>,
) -> u32 {
    let mut request = first_request;
    let mut pages_requested = 0;
    loop {
        pages_requested += 1;
        let result = fetcher.fetch(&request).await;
        match FetchOutcome::from_result(&request, result) {
            FetchOutcome::Failure(failure) => {
                if failures.send(failure).await.is_err() {
                    warn!("Failure of {request} dropped, receiver closed");
                }
                break;
            }
            FetchOutcome::Batch(repositories) if repositories.is_empty() => {
                debug!("No more repositories at {request}");
                break;
            }
            FetchOutcome::Batch(repositories) => {
                info!("Fetched {} repositories at {request}", repositories.len());
                if batches.send(repositories).await.is_err() {
                    warn!("Batch of {request} dropped, receiver closed");
                    break;
                }
                request = request.next();
            }
        }
    }

    pages_requested
}

#[async_trait::async_trait]
impl RepositoryCollector for PaginatedCollector {
    async fn collect(
        &self,
        account: &str,
        formatter: &mut dyn RepositoryFormatter,
    ) -> StdResult<CollectionSummary> {
        let first_request = PageRequest::try_new(account, 1, self.page_size)?;
        let (batches_sender, mut batches_receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let (failures_sender, mut failures_receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let producer = tokio::spawn(produce_pages(
            Arc::clone(&self.fetcher),
            first_request,
            batches_sender,
            failures_sender,
        ));

        let mut summary = CollectionSummary::default();
        let mut batches_open = true;
        let mut failures_open = true;
        while batches_open || failures_open {
            tokio::select! {
                batch = batches_receiver.recv(), if batches_open => match batch {
                    Some(repositories) => {
                        summary.batches += 1;
                        summary.repositories += repositories.len() as u32;
                        if let Err(e) = formatter.format(&repositories) {
                            error!("Failed to format batch #{}: {e:?}", summary.batches);
                        }
                    }
                    None => batches_open = false,
                },
                failure = failures_receiver.recv(), if failures_open => match failure {
                    Some(failure) => {
                        error!("{failure}");
                        summary.failure = Some(failure);
                    }
                    None => failures_open = false,
                },
            }
        }

        summary.pages_requested = producer.await?;
        info!("Collection for account {account} done: {summary}");

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use anyhow::anyhow;
    use mockall::{Sequence, predicate::eq};

    use crate::{FetchError, MockRepositoryFetcher, MockRepositoryFormatter};

    use super::*;

    /// Serves the pages of a fixed listing, like the API would.
    struct InMemoryFetcher {
        repositories: Vec<Repository>,
        calls: Arc<AtomicU32>,
    }

    impl InMemoryFetcher {
        fn new(total_repositories: usize) -> Self {
            Self {
                repositories: (1..=total_repositories)
                    .map(|i| Repository::new(&format!("repository-{i}"), i as u32, 0, 1, i % 3 == 0))
                    .collect(),
                calls: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    #[async_trait::async_trait]
    impl RepositoryFetcher for InMemoryFetcher {
        async fn fetch(&self, request: &PageRequest) -> Result<Vec<Repository>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let per_page = request.per_page() as usize;
            let start = (request.page() as usize - 1) * per_page;

            Ok(self
                .repositories
                .iter()
                .skip(start)
                .take(per_page)
                .cloned()
                .collect())
        }
    }

    /// Keeps every batch it receives.
    #[derive(Default)]
    struct RecordingFormatter {
        batches: Vec<Vec<Repository>>,
    }

    impl RepositoryFormatter for RecordingFormatter {
        fn format(&mut self, repositories: &[Repository]) -> StdResult<()> {
            self.batches.push(repositories.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn collect_emits_one_batch_per_non_empty_page_in_order() {
        for total_repositories in [1, 2, 4, 5, 9] {
            let fetcher = InMemoryFetcher::new(total_repositories);
            let expected_repositories = fetcher.repositories.clone();
            let collector = PaginatedCollector::new(Arc::new(fetcher)).with_page_size(2);
            let mut formatter = RecordingFormatter::default();

            let summary = collector.collect("octocat", &mut formatter).await.unwrap();

            let expected_batches = total_repositories.div_ceil(2);
            assert_eq!(expected_batches, formatter.batches.len());
            assert_eq!(
                expected_repositories,
                formatter.batches.concat(),
                "total_repositories={total_repositories}"
            );
            assert_eq!(
                CollectionSummary {
                    pages_requested: expected_batches as u32 + 1,
                    batches: expected_batches as u32,
                    repositories: total_repositories as u32,
                    failure: None,
                },
                summary
            );
        }
    }

    #[tokio::test]
    async fn collect_account_without_repositories() {
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_fetch()
                .withf(|request| request.page() == 1 && request.per_page() == DEFAULT_PAGE_SIZE)
                .returning(|_| Ok(vec![]))
                .times(1);

            fetcher
        };
        let mut formatter = MockRepositoryFormatter::new();
        let collector = PaginatedCollector::new(Arc::new(fetcher));

        let summary = collector.collect("octocat", &mut formatter).await.unwrap();

        assert_eq!(
            CollectionSummary {
                pages_requested: 1,
                ..CollectionSummary::default()
            },
            summary
        );
    }

    #[tokio::test]
    async fn collect_stops_at_first_failed_page() {
        let fetcher = {
            let mut sequence = Sequence::new();
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_fetch()
                .withf(|request| request.page() == 1)
                .returning(|_| {
                    Ok(vec![
                        Repository::dummy("repository-1"),
                        Repository::dummy("repository-2"),
                    ])
                })
                .times(1)
                .in_sequence(&mut sequence);
            fetcher
                .expect_fetch()
                .withf(|request| request.page() == 2)
                .returning(|_| Err(FetchError::UnexpectedStatus(403)))
                .times(1)
                .in_sequence(&mut sequence);

            fetcher
        };
        let mut formatter = {
            let mut formatter = MockRepositoryFormatter::new();
            formatter
                .expect_format()
                .with(eq(vec![
                    Repository::dummy("repository-1"),
                    Repository::dummy("repository-2"),
                ]))
                .returning(|_| Ok(()))
                .times(1);

            formatter
        };
        let collector = PaginatedCollector::new(Arc::new(fetcher)).with_page_size(2);

        let summary = collector.collect("octocat", &mut formatter).await.unwrap();

        assert_eq!(2, summary.pages_requested);
        assert_eq!(1, summary.batches);
        assert_eq!(2, summary.repositories);
        let failure = summary.failure.expect("Expected a page failure");
        assert_eq!("octocat", failure.account());
        assert_eq!(2, failure.page());
        assert_eq!(&FetchError::UnexpectedStatus(403), failure.error());
        let message = failure.to_string();
        assert!(message.contains("octocat") && message.contains("page 2"));
    }

    #[tokio::test]
    async fn collect_failure_on_first_page_emits_no_batch() {
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_fetch()
                .returning(|_| Err(FetchError::Transport("connection reset".to_string())))
                .times(1);

            fetcher
        };
        let mut formatter = MockRepositoryFormatter::new();
        let collector = PaginatedCollector::new(Arc::new(fetcher));

        let summary = collector.collect("octocat", &mut formatter).await.unwrap();

        assert_eq!(0, summary.batches);
        assert!(!summary.is_complete());
    }

    #[tokio::test]
    async fn collect_keeps_going_when_formatter_fails() {
        let fetcher = InMemoryFetcher::new(4);
        let mut formatter = {
            let mut sequence = Sequence::new();
            let mut formatter = MockRepositoryFormatter::new();
            formatter
                .expect_format()
                .returning(|_| Err(anyhow!("Broken pipe")))
                .times(1)
                .in_sequence(&mut sequence);
            formatter
                .expect_format()
                .returning(|_| Ok(()))
                .times(1)
                .in_sequence(&mut sequence);

            formatter
        };
        let collector = PaginatedCollector::new(Arc::new(fetcher)).with_page_size(2);

        let summary = collector.collect("octocat", &mut formatter).await.unwrap();

        assert_eq!(2, summary.batches);
        assert!(summary.is_complete());
    }

    #[tokio::test]
    async fn collect_fails_on_empty_account_without_fetching() {
        let fetcher = MockRepositoryFetcher::new();
        let mut formatter = MockRepositoryFormatter::new();
        let collector = PaginatedCollector::new(Arc::new(fetcher));

        collector
            .collect("", &mut formatter)
            .await
            .expect_err("Collector should fail with an empty account");
    }

    #[tokio::test]
    async fn collect_fails_if_producer_task_fails() {
        struct CrashingFetcher;

        #[async_trait::async_trait]
        impl RepositoryFetcher for CrashingFetcher {
            async fn fetch(&self, _request: &PageRequest) -> Result<Vec<Repository>, FetchError> {
                panic!("Fetcher crashed")
            }
        }

        let mut formatter = MockRepositoryFormatter::new();
        let collector = PaginatedCollector::new(Arc::new(CrashingFetcher));

        collector
            .collect("octocat", &mut formatter)
            .await
            .expect_err("Collector should fail if the producer task fails");
    }

    #[tokio::test]
    async fn collect_over_rest_api_keeps_batches_before_failed_page() {
        use std::time::Duration;

        use httpmock::prelude::*;
        use serde_json::json;

        use crate::{RestFetcher, TableFormatter};

        let server = MockServer::start_async().await;
        let first_page = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/users/octocat/repos")
                    .query_param("page", "1");
                then.status(200).json_body(json!([
                    { "name": "alpha", "fork": false, "forks_count": 1, "stargazers_count": 2, "watchers_count": 2 },
                    { "name": "beta", "fork": true, "forks_count": 0, "stargazers_count": 0, "watchers_count": 0 }
                ]));
            })
            .await;
        let second_page = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/users/octocat/repos")
                    .query_param("page", "2");
                then.status(403);
            })
            .await;
        let third_page = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/users/octocat/repos")
                    .query_param("page", "3");
                then.status(200).json_body(json!([]));
            })
            .await;
        let fetcher =
            RestFetcher::try_new(&server.base_url(), "credentials", Duration::from_secs(5)).unwrap();
        let collector = PaginatedCollector::new(Arc::new(fetcher)).with_page_size(2);
        let mut formatter = TableFormatter::new(Vec::new(), false);

        let summary = collector.collect("octocat", &mut formatter).await.unwrap();

        first_page.assert_hits_async(1).await;
        second_page.assert_hits_async(1).await;
        third_page.assert_hits_async(0).await;
        assert_eq!(2, summary.failure.map(|failure| failure.page()).unwrap_or_default());
        let output = String::from_utf8(formatter.into_inner()).unwrap();
        assert!(output.contains("alpha"));
        assert!(!output.contains("beta"));
    }

    #[tokio::test]
    async fn collect_producer_does_not_outrun_formatter() {
        /// Records how many pages had been fetched whenever a batch is formatted.
        struct SlowFormatter {
            fetcher_calls: Arc<AtomicU32>,
            formatted: u32,
            max_lead: u32,
        }

        impl RepositoryFormatter for SlowFormatter {
            fn format(&mut self, _repositories: &[Repository]) -> StdResult<()> {
                self.formatted += 1;
                std::thread::sleep(std::time::Duration::from_millis(5));
                let lead = self.fetcher_calls.load(Ordering::SeqCst) - self.formatted;
                self.max_lead = self.max_lead.max(lead);
                Ok(())
            }
        }

        let fetcher = InMemoryFetcher::new(20);
        let mut formatter = SlowFormatter {
            fetcher_calls: Arc::clone(&fetcher.calls),
            formatted: 0,
            max_lead: 0,
        };
        let collector = PaginatedCollector::new(Arc::new(fetcher)).with_page_size(1);

        let summary = collector.collect("octocat", &mut formatter).await.unwrap();

        assert_eq!(20, summary.batches);
        // one batch buffered in the channel, one more waiting to be sent
        assert!(formatter.max_lead <= 2, "max_lead={}", formatter.max_lead);
    }
}
