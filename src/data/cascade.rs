use std::collections::BTreeSet;

use super::model::Table;

/// Countries whose region is one of `selected_regions`.
///
/// An empty selection yields an empty set; the caller then clears its
/// country selection.
pub fn countries_for_regions(table: &Table, selected_regions: &BTreeSet<String>) -> BTreeSet<String> {
    if selected_regions.is_empty() {
        return BTreeSet::new();
    }
    table
        .rows
        .iter()
        .filter(|row| {
            row.region
                .as_ref()
                .is_some_and(|region| selected_regions.contains(region))
        })
        .map(|row| row.country.clone())
        .collect()
}
