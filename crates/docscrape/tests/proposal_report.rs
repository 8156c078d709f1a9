use std::collections::HashMap;

use docscrape::proposals::proposal_report;
use docscrape_crawler::{OnError, PageSource};
use futures::future::{ready, BoxFuture};

const PEPS_LIST_URL: &str = "https://peps.python.org/";

struct StaticSite(HashMap<String, String>);

impl StaticSite {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self(
            pages
                .iter()
                .map(|(url, page)| (url.to_string(), page.to_string()))
                .collect(),
        )
    }
}

impl PageSource for StaticSite {
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Option<String>> {
        Box::pin(ready(self.0.get(url).cloned()))
    }
}

fn index(rows: &str) -> String {
    format!(
        r#"<section><table class="pep-zero-table docutils align-default">
        <tbody>{rows}</tbody></table></section>"#
    )
}

fn detail(status: &str) -> String {
    format!(
        r#"<dl class="rfc2822 field-list simple">
        <dt>Author<span class="colon">:</span></dt><dd>Someone</dd>
        <dt>Status<span class="colon">:</span></dt><dd>{status}</dd>
        </dl>"#
    )
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

#[tokio::test]
async fn counts_statuses_from_detail_pages() {
    let page = index(
        r#"<tr><td>PA</td><td>1</td><td><a href="pep-0001/">1</a></td><td>Alice</td></tr>
        <tr><td>P</td><td>2</td><td><a href="pep-0002/">2</a></td><td>Bob</td></tr>"#,
    );
    let accepted = detail("Accepted");
    let draft = detail("Draft");
    let site = StaticSite::new(&[
        (PEPS_LIST_URL, &page),
        ("https://peps.python.org/pep-0001/", &accepted),
        ("https://peps.python.org/pep-0002/", &draft),
    ]);

    let rows = proposal_report(&site, 8, OnError::SkipAndLog)
        .await
        .unwrap()
        .unwrap();

    // Equal counts keep first-seen order: "Accepted" comes from row 1
    assert_eq!(
        vec![
            row(&["Status", "Count"]),
            row(&["Accepted", "1"]),
            row(&["Draft", "1"]),
            row(&["Total", "2"]),
        ],
        rows
    );
}

#[tokio::test]
async fn unfetchable_detail_pages_are_dropped_from_the_counts() {
    let page = index(
        r#"<tr><td>PA</td><td>1</td><td><a href="pep-0001/">1</a></td><td>Alice</td></tr>
        <tr><td>P</td><td>2</td><td><a href="pep-0002/">2</a></td><td>Bob</td></tr>"#,
    );
    let accepted = detail("Accepted");
    let site = StaticSite::new(&[
        (PEPS_LIST_URL, &page),
        ("https://peps.python.org/pep-0001/", &accepted),
    ]);

    let rows = proposal_report(&site, 8, OnError::SkipAndLog)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        vec![
            row(&["Status", "Count"]),
            row(&["Accepted", "1"]),
            row(&["Total", "1"]),
        ],
        rows
    );
}

#[tokio::test]
async fn mismatched_status_is_still_counted() {
    let page = index(
        r#"<tr><td>PR</td><td>3</td><td><a href="pep-0003/">3</a></td><td>Carol</td></tr>"#,
    );
    // Declared "R" only permits "Rejected"
    let final_ = detail("Final");
    let site = StaticSite::new(&[
        (PEPS_LIST_URL, &page),
        ("https://peps.python.org/pep-0003/", &final_),
    ]);

    let rows = proposal_report(&site, 8, OnError::SkipAndLog)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        vec![
            row(&["Status", "Count"]),
            row(&["Final", "1"]),
            row(&["Total", "1"]),
        ],
        rows
    );
}

#[tokio::test]
async fn unknown_declared_code_fails_the_crawl() {
    let page = index(
        r#"<tr><td>PX</td><td>4</td><td><a href="pep-0004/">4</a></td><td>Dave</td></tr>"#,
    );
    let draft = detail("Draft");
    let site = StaticSite::new(&[
        (PEPS_LIST_URL, &page),
        ("https://peps.python.org/pep-0004/", &draft),
    ]);

    let err = proposal_report(&site, 8, OnError::SkipAndLog)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no permitted statuses"));
}

#[tokio::test]
async fn unfetchable_index_produces_no_report() {
    let site = StaticSite::new(&[]);
    assert_eq!(
        None,
        proposal_report(&site, 8, OnError::SkipAndLog).await.unwrap()
    );
}

#[tokio::test]
async fn fail_strategy_aborts_on_a_missing_detail_page() {
    let page = index(
        r#"<tr><td>PA</td><td>1</td><td><a href="pep-0001/">1</a></td><td>Alice</td></tr>"#,
    );
    let site = StaticSite::new(&[(PEPS_LIST_URL, &page)]);

    let err = proposal_report(&site, 8, OnError::Fail).await.unwrap_err();
    assert!(err.to_string().contains("couldn't fetch proposal page"));
}
