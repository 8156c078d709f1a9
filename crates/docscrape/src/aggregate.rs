use crate::index::ProposalRecord;

/// Counts reconciled records per page status. Rows are sorted by ascending
/// count, ties keep the order statuses were first seen in, and the result
/// carries a header row and a trailing total. Records that were never
/// reconciled contribute nothing.
pub fn aggregate(records: &[ProposalRecord]) -> Vec<(String, String)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        let Some(status) = &record.page_status else {
            continue;
        };
        match counts.iter_mut().find(|(s, _)| s == status) {
            Some((_, n)) => *n += 1,
            None => counts.push((status.clone(), 1)),
        }
    }

    let total: usize = counts.iter().map(|(_, n)| n).sum();
    counts.sort_by_key(|&(_, n)| n);

    let mut rows = vec![(String::from("Status"), String::from("Count"))];
    rows.extend(counts.into_iter().map(|(s, n)| (s, n.to_string())));
    rows.push((String::from("Total"), total.to_string()));
    rows
}
