use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::api::ImageClient;
use crate::application::{FetchCoordinator, FetchResult};
use crate::cli::Cli;
use crate::domain::KnownFiles;
use crate::ui::ConsoleView;
use crate::utils::parse_url_list;

/// One full pass: banner, collect URLs, fetch each in order, sign off.
///
/// Only startup problems are returned as errors; per-URL failures are
/// reported on `out` and the loop moves on.
pub async fn run<R, W>(cli: &Cli, input: R, out: W) -> Result<Vec<FetchResult>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut view = ConsoleView::new(out);
    view.welcome()?;

    let urls = match cli.arg_urls() {
        Some(urls) => urls,
        None => {
            view.prompt()?;
            read_url_line(input).await?
        }
    };
    tracing::debug!(count = urls.len(), "collected URLs");

    tokio::fs::create_dir_all(&cli.dir)
        .await
        .with_context(|| format!("failed to create {}", cli.dir.display()))?;
    let mut known = KnownFiles::snapshot(&cli.dir)
        .await
        .with_context(|| format!("failed to list {}", cli.dir.display()))?;
    tracing::debug!(dir = %cli.dir.display(), existing = known.len(), "target directory ready");

    let client = ImageClient::new(&cli.fetcher_config()).context("failed to build HTTP client")?;
    let coordinator = FetchCoordinator::new(client, &cli.dir);

    let results = coordinator
        .fetch_all(&urls, &mut known, |result| {
            if let Err(e) = view.report(result) {
                tracing::warn!("failed to write status line: {}", e);
            }
        })
        .await;

    view.farewell()?;
    Ok(results)
}

/// Read a single line; EOF counts as no input.
async fn read_url_line<R: AsyncBufRead + Unpin>(mut input: R) -> Result<Vec<String>> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .await
        .context("failed to read URLs from stdin")?;
    Ok(parse_url_list(&line))
}
