use anyhow::{bail, Context, Result};
use select::document::Document;
use select::node::Node;
use select::predicate::{Class, Name, Predicate};
use url::Url;

use crate::extract;

/// One row of the proposal index, before its detail page has been visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalRecord {
    pub number: u32,
    pub type_code: String,
    /// Status code declared in the index row, if any.
    pub declared_status: Option<char>,
    /// Absolute URL of the detail page.
    pub link: String,
    pub author: String,
    /// Status found on the detail page; set once by reconciliation.
    pub page_status: Option<String>,
}

/// Walks every proposal index table and produces records in document order.
///
/// The first cell holds a one or two character code; a second character is
/// the declared status. Rows with a malformed number, or tables without a
/// body, fail the whole crawl.
pub fn read_index(doc: &Document, base: &Url) -> Result<Vec<ProposalRecord>> {
    let mut records = Vec::new();
    for table in doc.find(Name("table").and(Class("pep-zero-table"))) {
        let body = extract::require(table, Name("tbody"), "tbody")?;
        for row in body.find(Name("tr")) {
            records.push(read_row(row, base)?);
        }
    }
    Ok(records)
}

fn read_row(row: Node, base: &Url) -> Result<ProposalRecord> {
    let cells: Vec<Node> = row.find(Name("td")).collect();
    if cells.len() < 4 {
        bail!("malformed index row: expected 4 cells, got {}", cells.len());
    }

    let code = cells[0].text();
    let code = code.trim();
    let mut chars = code.chars();
    let (type_code, declared_status) = match (chars.next(), chars.next(), chars.next()) {
        (Some(t), Some(s), None) => (t.to_string(), Some(s)),
        _ => (code.to_string(), None),
    };

    let number = cells[1]
        .text()
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid proposal number {:?}", cells[1].text().trim()))?;

    let anchor = extract::require(cells[2], Name("a"), "a")?;
    let link = base.join(extract::require_attr(anchor, "href")?)?.to_string();

    Ok(ProposalRecord {
        number,
        type_code,
        declared_status,
        link,
        author: cells[3].text().trim().to_string(),
        page_status: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://peps.python.org/").unwrap()
    }

    fn index(rows: &str) -> String {
        format!(
            r#"<table class="pep-zero-table docutils align-default">
            <tbody>{rows}</tbody></table>"#
        )
    }

    #[test]
    fn reads_rows_from_every_index_table() {
        let one = index(r#"<tr><td>PA</td><td>1</td><td><a href="pep-0001/">1</a></td><td>Alice</td></tr>"#);
        let two = index(r#"<tr><td>I</td><td>20</td><td><a href="pep-0020/">20</a></td><td>Bob</td></tr>"#);
        let doc = Document::from(format!("{one}{two}").as_str());

        let records = read_index(&doc, &base()).unwrap();
        assert_eq!(2, records.len());
        assert_eq!(vec![1, 20], records.iter().map(|r| r.number).collect::<Vec<_>>());
    }

    #[test]
    fn splits_two_character_codes() {
        let page = index(
            r#"<tr><td> PA </td><td>1</td><td><a href="pep-0001/">1</a></td><td>Alice</td></tr>"#,
        );
        let doc = Document::from(page.as_str());

        let record = read_index(&doc, &base()).unwrap().remove(0);
        assert_eq!("P", record.type_code);
        assert_eq!(Some('A'), record.declared_status);
        assert_eq!("https://peps.python.org/pep-0001/", record.link);
        assert_eq!("Alice", record.author);
    }

    #[test]
    fn single_character_code_has_no_declared_status() {
        let page = index(
            r#"<tr><td>P</td><td>2</td><td><a href="pep-0002/">2</a></td><td>Bob</td></tr>"#,
        );
        let doc = Document::from(page.as_str());

        let record = read_index(&doc, &base()).unwrap().remove(0);
        assert_eq!("P", record.type_code);
        assert_eq!(None, record.declared_status);
    }

    #[test]
    fn malformed_number_fails_the_crawl() {
        let page = index(
            r#"<tr><td>P</td><td>2x</td><td><a href="pep-0002/">2</a></td><td>Bob</td></tr>"#,
        );
        let doc = Document::from(page.as_str());

        let err = read_index(&doc, &base()).unwrap_err();
        assert!(err.to_string().contains("invalid proposal number"));
    }

    #[test]
    fn table_without_a_body_fails_the_crawl() {
        let doc = Document::from(r#"<table class="pep-zero-table"></table>"#);
        assert!(read_index(&doc, &base()).is_err());
    }

    #[test]
    fn missing_link_anchor_fails_the_crawl() {
        let page = index(r#"<tr><td>P</td><td>2</td><td>no anchor</td><td>Bob</td></tr>"#);
        let doc = Document::from(page.as_str());
        assert!(read_index(&doc, &base()).is_err());
    }

    #[test]
    fn other_tables_are_ignored() {
        let doc = Document::from(r#"<table class="docutils"><tbody><tr><td>x</td></tr></tbody></table>"#);
        assert!(read_index(&doc, &base()).unwrap().is_empty());
    }
}
