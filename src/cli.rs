use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::api::models::{ACCEPT_IMAGES, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::api::FetcherConfig;
use crate::utils::parse_url_list;

pub const DEFAULT_SAVE_DIR: &str = "Fetched_Images";

/// Fetch images from the web into a local directory, skipping duplicates.
#[derive(Debug, Parser)]
#[command(name = "image-fetcher", version)]
#[command(about = "Fetch images from URLs into a local directory", long_about = None)]
pub struct Cli {
    /// Image URLs, each optionally a comma-separated list. Prompts on stdin when omitted.
    pub urls: Vec<String>,

    /// Directory the images are written to.
    #[arg(short, long, default_value = DEFAULT_SAVE_DIR)]
    pub dir: PathBuf,

    /// Per-request timeout in seconds.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// User-Agent header sent with every request.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log debug output to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            user_agent: self.user_agent.clone(),
            accept: ACCEPT_IMAGES.to_string(),
            timeout: Duration::from_secs(self.timeout),
        }
    }

    /// URLs given on the command line, or `None` if stdin should be read.
    pub fn arg_urls(&self) -> Option<Vec<String>> {
        if self.urls.is_empty() {
            return None;
        }
        Some(self.urls.iter().flat_map(|arg| parse_url_list(arg)).collect())
    }
}
