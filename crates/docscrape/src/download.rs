use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};
use select::document::Document;
use select::predicate::{Class, Name, Predicate};
use url::Url;

use docscrape_crawler::{Fetcher, PageSource};

use crate::constants::{DOWNLOADS_DIR, DOWNLOADS_URL};
use crate::extract;

/// Downloads the A4 PDF documentation archive into the downloads directory.
pub async fn download_docs(fetcher: &Fetcher) -> Result<()> {
    let Some(page) = fetcher.fetch_text(DOWNLOADS_URL).await else {
        return Ok(());
    };
    let doc = Document::from(page.as_str());

    let table = extract::require_doc(&doc, Name("table").and(Class("docutils")), "table.docutils")?;
    let href = table
        .find(Name("a"))
        .filter_map(|a| a.attr("href"))
        .find(|href| href.ends_with("pdf-a4.zip"))
        .ok_or_else(|| extract::not_found("a[href$=pdf-a4.zip]"))?;
    let archive_url = Url::parse(DOWNLOADS_URL)?.join(href)?;

    let filename = archive_url
        .path_segments()
        .and_then(|segments| segments.last())
        .ok_or_else(|| anyhow!("couldn't derive a file name from {archive_url}"))?
        .to_string();

    let dir = Path::new(DOWNLOADS_DIR);
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);

    let bytes = fetcher.fetch_bytes(archive_url.as_str()).await?;
    fs::write(&path, bytes)?;
    log::info!("Archive downloaded and saved to {}", path.display());
    Ok(())
}
