mod cache;
mod config;
mod crawler;

pub use cache::PageCache;
pub use config::{CrawlerConfig, OnError};
pub use crawler::{Fetcher, PageSource};

pub use anyhow;
