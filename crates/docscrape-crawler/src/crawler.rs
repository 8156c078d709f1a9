use std::time::Duration;

use anyhow::Result;
use futures::future::BoxFuture;
use lazy_static::lazy_static;
use reqwest::header::USER_AGENT;

use crate::cache::PageCache;
use crate::config::CrawlerConfig;

lazy_static! {
    static ref HTTP_CLI: reqwest::Client = reqwest::ClientBuilder::new()
        .gzip(true)
        .deflate(true)
        .build()
        .unwrap();
}

/// A source of text pages addressed by URL.
///
/// One attempt per page: implementations log fetch failures and report them
/// as `None`, they never raise.
pub trait PageSource {
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Option<String>>;
}

pub struct Fetcher {
    config: CrawlerConfig,
    cache: PageCache,
}

impl Fetcher {
    pub fn new(config: CrawlerConfig) -> Self {
        let cache = PageCache::new(config.cache_dir.clone());
        Self { config, cache }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Downloads raw bytes, bypassing the page cache.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.request(url).send().await?.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }

    async fn download_text(&self, url: &str) -> Result<String> {
        let resp = self.request(url).send().await?.error_for_status()?;
        Ok(resp.text_with_charset("utf-8").await?)
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        HTTP_CLI
            .get(url)
            .header(USER_AGENT, &self.config.user_agent)
            .timeout(Duration::from_secs_f32(self.config.page_timeout))
    }
}

impl PageSource for Fetcher {
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Option<String>> {
        Box::pin(async move {
            if let Some(page) = self.cache.get(url) {
                return Some(page);
            }
            match self.download_text(url).await {
                Ok(page) => {
                    self.cache.put(url, &page);
                    Some(page)
                }
                Err(e) => {
                    log::warn!("Couldn't fetch {url}: {e}");
                    None
                }
            }
        })
    }
}
