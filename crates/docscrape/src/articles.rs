use std::cmp;

use anyhow::{bail, Result};
use futures::{stream, StreamExt};
use select::document::Document;
use select::predicate::{Attr, Class, Name, Predicate};
use url::Url;

use docscrape_crawler::{OnError, PageSource};

use crate::constants::WHATS_NEW_URL;
use crate::extract;

/// Crawls the "What's New in Python" index and its per-release articles.
///
/// Returns `None` when the index itself couldn't be fetched; articles that
/// couldn't be fetched are skipped.
pub async fn index_report<S: PageSource>(
    source: &S,
    concurrent: usize,
    on_error: OnError,
) -> Result<Option<Vec<Vec<String>>>> {
    let Some(page) = source.fetch_text(WHATS_NEW_URL).await else {
        return Ok(None);
    };
    let doc = Document::from(page.as_str());
    let base = Url::parse(WHATS_NEW_URL)?;
    let links = article_links(&doc, &base)?;

    let pages: Vec<(String, Option<String>)> = stream::iter(links)
        .map(|link| async move {
            let page = source.fetch_text(&link).await;
            (link, page)
        })
        .buffered(cmp::max(1, concurrent))
        .collect()
        .await;

    let mut rows = vec![vec![
        String::from("Article link"),
        String::from("Title"),
        String::from("Editor, author"),
    ]];
    for (link, page) in pages {
        let Some(page) = page else {
            match on_error {
                OnError::Fail => bail!("couldn't fetch article page {link}"),
                OnError::SkipAndLog => continue,
            }
        };
        let doc = Document::from(page.as_str());
        let title = extract::require_doc(&doc, Name("h1"), "h1")?.text();
        let authors = extract::require_doc(&doc, Name("dl"), "dl")?
            .text()
            .replace('\n', " ");
        rows.push(vec![link, title, authors]);
    }
    Ok(Some(rows))
}

fn article_links(doc: &Document, base: &Url) -> Result<Vec<String>> {
    let section = extract::require_doc(
        doc,
        Name("section").and(Attr("id", "what-s-new-in-python")),
        r#"section id="what-s-new-in-python""#,
    )?;
    let toctree = extract::require(
        section,
        Name("div").and(Class("toctree-wrapper")),
        "div.toctree-wrapper",
    )?;

    let mut links = Vec::new();
    for item in toctree.find(Name("li").and(Class("toctree-l1"))) {
        let anchor = extract::require(item, Name("a"), "a")?;
        let href = extract::require_attr(anchor, "href")?;
        links.push(base.join(href)?.to_string());
    }
    Ok(links)
}
