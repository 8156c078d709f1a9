use anyhow::Result;
use select::document::Document;
use url::Url;

use docscrape_crawler::{OnError, PageSource};

use crate::constants::PEPS_LIST_URL;
use crate::{aggregate, index, reconcile};

/// The proposal pipeline: index -> per-page reconciliation -> status counts.
///
/// Returns `None` when the index itself couldn't be fetched.
pub async fn proposal_report<S: PageSource>(
    source: &S,
    concurrent: usize,
    on_error: OnError,
) -> Result<Option<Vec<Vec<String>>>> {
    let Some(page) = source.fetch_text(PEPS_LIST_URL).await else {
        return Ok(None);
    };
    let doc = Document::from(page.as_str());
    let base = Url::parse(PEPS_LIST_URL)?;

    let records = index::read_index(&doc, &base)?;
    log::info!("Found {} proposals in the index", records.len());

    let records = reconcile::reconcile_all(source, records, concurrent, on_error).await?;
    let rows = aggregate::aggregate(&records)
        .into_iter()
        .map(|(status, count)| vec![status, count])
        .collect();
    Ok(Some(rows))
}
