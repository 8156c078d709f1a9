use std::cmp;

use anyhow::{anyhow, bail, Result};
use futures::{stream, StreamExt};
use select::document::Document;
use select::predicate::Name;

use docscrape_crawler::{OnError, PageSource};

use crate::index::ProposalRecord;
use crate::{extract, status};

/// What became of a single record after visiting its detail page.
#[derive(Debug)]
pub enum Outcome {
    Reconciled(ProposalRecord),
    Skipped { link: String },
}

/// Visits every record's detail page, with up to `concurrent` downloads in
/// flight. Results keep index order, so downstream first-seen tie-breaking
/// doesn't depend on download timing. Skipped records are dropped here.
pub async fn reconcile_all<S: PageSource>(
    source: &S,
    records: Vec<ProposalRecord>,
    concurrent: usize,
    on_error: OnError,
) -> Result<Vec<ProposalRecord>> {
    let outcomes: Vec<Result<Outcome>> = stream::iter(records)
        .map(|record| reconcile(source, record, on_error))
        .buffered(cmp::max(1, concurrent))
        .collect()
        .await;

    let mut reconciled = Vec::new();
    for outcome in outcomes {
        if let Outcome::Reconciled(record) = outcome? {
            reconciled.push(record);
        }
    }
    Ok(reconciled)
}

/// Reads the authoritative status from the record's detail page and warns
/// when it is not permitted for the code declared in the index. Records
/// without a declared code are not checked.
pub async fn reconcile<S: PageSource>(
    source: &S,
    mut record: ProposalRecord,
    on_error: OnError,
) -> Result<Outcome> {
    let Some(page) = source.fetch_text(&record.link).await else {
        match on_error {
            OnError::Fail => bail!("couldn't fetch proposal page {}", record.link),
            OnError::SkipAndLog => {
                log::warn!(
                    "Dropping proposal {}: page couldn't be fetched: {}",
                    record.number,
                    record.link
                );
                return Ok(Outcome::Skipped { link: record.link });
            }
        }
    };

    let status = page_status(&Document::from(page.as_str()))?;
    if let Some(code) = record.declared_status {
        let permitted = status::permitted(Some(code))
            .ok_or_else(|| anyhow!("no permitted statuses configured for code {code:?}"))?;
        if !permitted.contains(&status.as_str()) {
            log::warn!(
                "Mismatched statuses:\n{}\nStatus on page: {}\nExpected statuses: {:?}",
                record.link,
                status,
                permitted
            );
        }
    }
    record.page_status = Some(status);
    Ok(Outcome::Reconciled(record))
}

/// Reads the value of the `Status` entry in the page's metadata list.
fn page_status(doc: &Document) -> Result<String> {
    let dl = extract::require_doc(doc, Name("dl"), "dl")?;
    let label = dl
        .find(Name("dt"))
        .find(|dt| {
            let text = dt.text();
            text.trim().trim_end_matches(':') == "Status"
        })
        .ok_or_else(|| extract::not_found(r#"dt "Status""#))?;

    let mut sibling = label.next();
    while let Some(node) = sibling {
        if node.name() == Some("dd") {
            return Ok(node.text());
        }
        sibling = node.next();
    }
    Err(extract::not_found(r#"dd value for dt "Status""#))
}
