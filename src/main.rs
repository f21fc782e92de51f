use std::{
    io::{self, IsTerminal},
    sync::Arc,
};

use clap::Parser;
use log::{debug, info, warn};

use github_repo_stats::{
    Configuration, DEFAULT_REQUEST_TIMEOUT, GITHUB_REST_ENDPOINT, JsonLinesFormatter,
    OutputFormat, PaginatedCollector, RepositoryCollector, RepositoryFormatter, RestFetcher,
    StdResult, TableFormatter,
};

/// Lists the repositories owned by a GitHub account with their forks, stars and watchers.
///
/// The GitHub token is read from the GITHUB_TOKEN environment variable.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// The GitHub account whose repositories are listed
    account: String,
}

#[tokio::main]
async fn main() -> StdResult<()> {
    env_logger::init();
    let args = Args::parse();
    let configuration = Configuration::from_env()?;
    debug!("Configuration: {configuration:?}, arguments: {args:?}");

    let collector = build_collector(&configuration)?;
    let mut formatter = build_formatter(configuration.output_format());
    info!("Collecting repositories of {}", args.account);
    let summary = collector.collect(&args.account, formatter.as_mut()).await?;
    if !summary.is_complete() {
        warn!("Repositories of {} are partially listed: {summary}", args.account);
    }

    Ok(())
}

fn build_collector(configuration: &Configuration) -> StdResult<Arc<dyn RepositoryCollector>> {
    let fetcher = Arc::new(RestFetcher::try_new(
        configuration.api_endpoint(GITHUB_REST_ENDPOINT),
        configuration.github_token(),
        DEFAULT_REQUEST_TIMEOUT,
    )?);

    Ok(Arc::new(PaginatedCollector::new(fetcher)))
}

fn build_formatter(output_format: OutputFormat) -> Box<dyn RepositoryFormatter> {
    let stdout = io::stdout();
    match output_format {
        OutputFormat::Table => {
            let styling = stdout.is_terminal();
            Box::new(TableFormatter::new(stdout, styling))
        }
        OutputFormat::Json => Box::new(JsonLinesFormatter::new(stdout)),
    }
}
