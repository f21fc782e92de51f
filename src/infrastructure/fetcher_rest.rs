use std::{fmt::Debug, time::Duration};

use anyhow::{Context, anyhow};
use log::debug;
use reqwest::{Client, StatusCode, Url, header};

use crate::{FetchError, PageRequest, Repository, RepositoryFetcher, StdResult};

/// The REST production endpoint for GitHub.
pub const GITHUB_REST_ENDPOINT: &str = "https://api.github.com";

/// The timeout applied to every page request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches pages of repositories from the GitHub REST API.
pub struct RestFetcher {
    client: Client,
    endpoint: Url,
    token: String,
}

impl RestFetcher {
    /// Creates a new `RestFetcher` targeting the given API base URL.
    pub fn try_new(endpoint: &str, token: &str, timeout: Duration) -> StdResult<Self> {
        let endpoint =
            Url::parse(endpoint).with_context(|| format!("Invalid API endpoint: {endpoint}"))?;
        if endpoint.cannot_be_a_base() {
            return Err(anyhow!("API endpoint cannot be used as a base: {endpoint}"));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .with_context(|| "Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            token: token.to_string(),
        })
    }

    fn repositories_url(&self, request: &PageRequest) -> Result<Url, FetchError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("Invalid API endpoint: {}", self.endpoint)))?
            .pop_if_empty()
            .extend(["users", request.account(), "repos"]);
        url.query_pairs_mut()
            .append_pair("per_page", &request.per_page().to_string())
            .append_pair("page", &request.page().to_string());

        Ok(url)
    }
}

impl Debug for RestFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestFetcher")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait::async_trait]
impl RepositoryFetcher for RestFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<Vec<Repository>, FetchError> {
        let url = self.repositories_url(request)?;
        debug!("Fetching {request} from {url}");
        let response = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, GITHUB_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        serde_json::from_str::<Vec<Repository>>(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
