use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use select::document::Document;
use select::predicate::{Class, Name, Predicate};

use docscrape_crawler::PageSource;

use crate::constants::MAIN_DOC_URL;
use crate::extract;

lazy_static! {
    static ref VERSION_STATUS: Regex =
        Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)").unwrap();
}

/// Lists every documented Python version with its support status.
pub async fn version_report<S: PageSource>(source: &S) -> Result<Option<Vec<Vec<String>>>> {
    let Some(page) = source.fetch_text(MAIN_DOC_URL).await else {
        return Ok(None);
    };
    Ok(Some(read_versions(&Document::from(page.as_str()))?))
}

fn read_versions(doc: &Document) -> Result<Vec<Vec<String>>> {
    let sidebar = extract::require_doc(
        doc,
        Name("div").and(Class("sphinxsidebarwrapper")),
        "div.sphinxsidebarwrapper",
    )?;
    let anchors = sidebar
        .find(Name("ul"))
        .find(|ul| ul.text().contains("All versions"))
        .map(|ul| ul.find(Name("a")).collect::<Vec<_>>())
        .ok_or_else(|| anyhow!("version list not found in the sidebar"))?;

    let mut rows = vec![vec![
        String::from("Documentation link"),
        String::from("Version"),
        String::from("Status"),
    ]];
    for anchor in anchors {
        let link = extract::require_attr(anchor, "href")?.to_string();
        let text = anchor.text();
        let (version, status) = match VERSION_STATUS.captures(&text) {
            Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
            None => (text.clone(), String::new()),
        };
        rows.push(vec![link, version, status]);
    }
    Ok(rows)
}
