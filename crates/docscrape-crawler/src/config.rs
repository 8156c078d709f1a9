use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_concurrent_downloads")]
    pub concurrent_downloads: usize,

    /// Per request timeout, in seconds.
    #[serde(default = "default_page_timeout")]
    pub page_timeout: f32,

    /// On-disk page cache location, `None` disables disk caching.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: Option<PathBuf>,

    #[serde(default = "default_on_fetch_error")]
    pub on_fetch_error: OnError,

    #[serde(default = "default_handle_sigint")]
    pub handle_sigint: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            concurrent_downloads: default_concurrent_downloads(),
            page_timeout: default_page_timeout(),
            cache_dir: default_cache_dir(),
            on_fetch_error: default_on_fetch_error(),
            handle_sigint: default_handle_sigint(),
        }
    }
}

fn default_user_agent() -> String {
    String::from("DocscrapeBot")
}

fn default_concurrent_downloads() -> usize {
    16
}

fn default_page_timeout() -> f32 {
    30.0
}

fn default_cache_dir() -> Option<PathBuf> {
    Some(PathBuf::from(".docscrape-cache"))
}

fn default_on_fetch_error() -> OnError {
    OnError::SkipAndLog
}

fn default_handle_sigint() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OnError {
    Fail,
    SkipAndLog,
}
