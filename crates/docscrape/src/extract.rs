//! Find-first-or-fail querying over parsed pages. A required element that is
//! absent means the page shape changed under us, which aborts the crawl.

use anyhow::{anyhow, Error, Result};
use select::document::Document;
use select::node::Node;
use select::predicate::Predicate;

/// Finds the first match in the whole document.
pub fn require_doc<'a, P: Predicate>(
    doc: &'a Document,
    predicate: P,
    what: &str,
) -> Result<Node<'a>> {
    doc.find(predicate).next().ok_or_else(|| not_found(what))
}

/// Like [`require_doc`], scoped to the descendants of `node`.
pub fn require<'a, P: Predicate>(node: Node<'a>, predicate: P, what: &str) -> Result<Node<'a>> {
    node.find(predicate).next().ok_or_else(|| not_found(what))
}

pub fn require_attr<'a>(node: Node<'a>, name: &str) -> Result<&'a str> {
    node.attr(name).ok_or_else(|| {
        not_found(&format!(
            "attribute {name:?} on <{}>",
            node.name().unwrap_or("?")
        ))
    })
}

pub(crate) fn not_found(what: &str) -> Error {
    log::error!("Required element not found: {what}");
    anyhow!("required element not found: {what}")
}
