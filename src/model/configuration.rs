use std::{fmt::Debug, str::FromStr};

use super::InvalidArguments;

/// The environment variable holding the GitHub credential.
pub const GITHUB_TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// The environment variable overriding the GitHub REST endpoint.
pub const GITHUB_API_URL_ENV_VAR: &str = "GITHUB_API_URL";

/// The environment variable selecting the output format.
pub const OUTPUT_FORMAT_ENV_VAR: &str = "REPO_STATS_FORMAT";

/// How batches are rendered on the standard output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One table per batch.
    #[default]
    Table,

    /// One JSON object per repository.
    Json,
}

impl FromStr for OutputFormat {
    type Err = InvalidArguments;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(InvalidArguments::InvalidSetting {
                name: OUTPUT_FORMAT_ENV_VAR.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

/// Settings resolved from the environment once, then passed explicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    github_token: String,
    api_endpoint: Option<String>,
    output_format: OutputFormat,
}

impl Configuration {
    /// Resolves the configuration from the process environment.
    pub fn from_env() -> Result<Self, InvalidArguments> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InvalidArguments>
    where
        F: Fn(&str) -> Option<String>,
    {
        let github_token = lookup(GITHUB_TOKEN_ENV_VAR)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| InvalidArguments::MissingCredential(GITHUB_TOKEN_ENV_VAR.to_string()))?;
        let api_endpoint = lookup(GITHUB_API_URL_ENV_VAR).filter(|url| !url.trim().is_empty());
        let output_format = match lookup(OUTPUT_FORMAT_ENV_VAR) {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => OutputFormat::default(),
        };

        Ok(Self {
            github_token,
            api_endpoint,
            output_format,
        })
    }

    /// Retrieves the GitHub credential.
    pub fn github_token(&self) -> &str {
        &self.github_token
    }

    /// Retrieves the REST endpoint, falling back to `default` when not overridden.
    pub fn api_endpoint<'a>(&'a self, default: &'a str) -> &'a str {
        self.api_endpoint.as_deref().unwrap_or(default)
    }

    /// Retrieves the output format.
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }
}

impl Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("github_token", &"<redacted>")
            .field("api_endpoint", &self.api_endpoint)
            .field("output_format", &self.output_format)
            .finish()
    }
}
