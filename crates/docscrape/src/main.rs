use std::env;
use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use docscrape::outputs::{control_output, OutputKind};
use docscrape::{articles, download, proposals, status, versions};
use docscrape_crawler::{CrawlerConfig, Fetcher, OnError, PageCache};
use tokio::runtime;

/// Python documentation scraper
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Scraper work mode
    #[arg(value_enum)]
    mode: Mode,
    /// Clear the on-disk page cache before crawling
    #[arg(long, short)]
    clear_cache: bool,
    /// Report output form, prints space separated rows when omitted
    #[arg(value_enum, long, short)]
    output: Option<OutputKind>,
    /// Optional default crawler yaml configuration file
    #[arg(env = "DOCSCRAPE_CRAWLER_CONFIG", long)]
    crawler_config: Option<PathBuf>,
    /// Override crawler's user agent
    #[arg(long)]
    user_agent: Option<String>,
    /// Override crawler's maximum concurrent page downloads
    #[arg(long)]
    concurrent_downloads: Option<usize>,
    /// Override crawler's per request timeout in seconds
    #[arg(long)]
    page_timeout: Option<f32>,
    /// Override crawler's page cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    /// Override crawler's fetch error handling strategy
    #[arg(value_enum, long)]
    on_fetch_error: Option<OnError>,
    /// No SIGINT handling, in-flight downloads won't be aborted
    #[arg(long)]
    no_sigint: bool,
    /// When quiet no logs are outputted
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Per-release articles from the "What's New" index
    IndexReport,
    /// Documented Python versions with their support status
    VersionReport,
    /// Download the PDF documentation archive
    Download,
    /// Proposal status reconciliation report
    ProposalReport,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Self::IndexReport => "index-report",
            Self::VersionReport => "version-report",
            Self::Download => "download",
            Self::ProposalReport => "proposal-report",
        }
    }
}

impl TryFrom<&Args> for CrawlerConfig {
    type Error = anyhow::Error;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let mut conf = if let Some(file) = args.crawler_config.as_ref().map(File::open) {
            serde_yaml::from_reader(file?)?
        } else {
            CrawlerConfig::default()
        };
        if let Some(user_agent) = &args.user_agent {
            conf.user_agent = user_agent.to_string();
        }
        if let Some(concurrent_downloads) = args.concurrent_downloads {
            conf.concurrent_downloads = concurrent_downloads;
        }
        if let Some(page_timeout) = args.page_timeout {
            conf.page_timeout = page_timeout;
        }
        if let Some(cache_dir) = &args.cache_dir {
            conf.cache_dir = Some(cache_dir.clone());
        }
        if let Some(on_fetch_error) = args.on_fetch_error {
            conf.on_fetch_error = on_fetch_error;
        }
        if args.no_sigint {
            conf.handle_sigint = false;
        }
        Ok(conf)
    }
}

async fn run_mode(mode: Mode, fetcher: &Fetcher) -> anyhow::Result<Option<Vec<Vec<String>>>> {
    let conf = fetcher.config();
    match mode {
        Mode::IndexReport => {
            articles::index_report(fetcher, conf.concurrent_downloads, conf.on_fetch_error).await
        }
        Mode::VersionReport => versions::version_report(fetcher).await,
        Mode::Download => download::download_docs(fetcher).await.map(|()| None),
        Mode::ProposalReport => {
            proposals::proposal_report(fetcher, conf.concurrent_downloads, conf.on_fetch_error)
                .await
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if !args.quiet {
        env::set_var("RUST_LOG", "info");
        env_logger::init();
    }
    log::info!("Scraper started");
    log::info!("Command line arguments: {args:?}");

    status::validate()?;
    let conf = CrawlerConfig::try_from(&args)?;
    if args.clear_cache {
        if let Some(dir) = &conf.cache_dir {
            PageCache::clear(dir)?;
        }
    }

    let handle_sigint = conf.handle_sigint;
    let fetcher = Fetcher::new(conf);
    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    let results = rt.block_on(async {
        if handle_sigint {
            tokio::select! {
                res = run_mode(args.mode, &fetcher) => res,
                _ = tokio::signal::ctrl_c() => anyhow::bail!("Interrupted"),
            }
        } else {
            run_mode(args.mode, &fetcher).await
        }
    })?;

    if let Some(rows) = results {
        control_output(&rows, args.mode.as_str(), args.output)?;
    }
    log::info!("Scraper finished");
    Ok(())
}
