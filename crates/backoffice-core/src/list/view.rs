// Local sorting and filtering over one loaded page.

use crate::resource::Resource;

use super::state::{SortDirection, SortSpec};

/// Stable sort by one column. Descending reverses the comparator rather
/// than the result, so equal rows keep their relative order either way.
pub(crate) fn sort_rows<R: Resource>(rows: &mut [R::Row], sort: &SortSpec) {
    if R::column(&sort.key).is_none() {
        tracing::debug!(key = %sort.key, resource = R::LABEL, "ignoring sort on unknown column");
        return;
    }
    rows.sort_by(|a, b| {
        let ord = R::cell(a, &sort.key).compare(&R::cell(b, &sort.key));
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Indices of rows where any displayed column contains `filter`
/// (trimmed, case-insensitive). An empty filter matches everything.
pub(crate) fn matching_indices<R: Resource>(rows: &[R::Row], filter: &str) -> Vec<usize> {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return (0..rows.len()).collect();
    }
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row_matches::<R>(row, &needle))
        .map(|(i, _)| i)
        .collect()
}

fn row_matches<R: Resource>(row: &R::Row, needle: &str) -> bool {
    R::columns()
        .iter()
        .any(|c| R::cell(row, c.key).to_string().to_lowercase().contains(needle))
}
