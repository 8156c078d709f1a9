use anyhow::{bail, Result};

/// Declared status code -> statuses permitted on the proposal's own page.
/// The codeless entry applies to index rows that declare no status.
pub const EXPECTED_STATUS: &[(Option<char>, &[&str])] = &[
    (Some('A'), &["Active", "Accepted"]),
    (Some('D'), &["Deferred"]),
    (Some('F'), &["Final"]),
    (Some('P'), &["Provisional"]),
    (Some('R'), &["Rejected"]),
    (Some('S'), &["Superseded"]),
    (Some('W'), &["Withdrawn"]),
    (None, &["Draft", "Active"]),
];

pub fn permitted(code: Option<char>) -> Option<&'static [&'static str]> {
    EXPECTED_STATUS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, statuses)| *statuses)
}

/// Checks the status table once at startup, before any page is fetched.
pub fn validate() -> Result<()> {
    check_table(EXPECTED_STATUS)
}

fn check_table(table: &[(Option<char>, &[&str])]) -> Result<()> {
    for (i, (code, statuses)) in table.iter().enumerate() {
        if statuses.is_empty() {
            bail!("status table entry {code:?} has no permitted statuses");
        }
        if table[..i].iter().any(|(c, _)| c == code) {
            bail!("duplicate status table entry {code:?}");
        }
    }
    if !table.iter().any(|(c, _)| c.is_none()) {
        bail!("status table is missing the entry for rows without a declared code");
    }
    Ok(())
}
