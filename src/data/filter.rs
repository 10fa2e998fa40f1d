use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dimension, DimensionValue, SalaryTable};

// ---------------------------------------------------------------------------
// Filter selection: which distinct values are allowed per dimension
// ---------------------------------------------------------------------------

/// Per-dimension selection state: maps dimension → set of selected values.
/// A dimension absent from the map is unconstrained; an empty set rejects
/// every record.
pub type FilterState = BTreeMap<Dimension, BTreeSet<DimensionValue>>;

/// Initialise a [`FilterState`] with all values selected (i.e., show everything).
pub fn init_filter_state(table: &SalaryTable) -> FilterState {
    table
        .unique_values()
        .iter()
        .map(|(dim, vals)| (*dim, vals.clone()))
        .collect()
}

/// Return indices of records that pass all active filters, in table order.
///
/// A record passes when, for every dimension in `filters`, its value is a
/// member of that dimension's selected set.
pub fn filtered_indices(table: &SalaryTable, filters: &FilterState) -> Vec<usize> {
    // Dimensions with every value selected cannot reject anything.
    let active: Vec<(Dimension, &BTreeSet<DimensionValue>)> = filters
        .iter()
        .filter(|(dim, selected)| {
            let all_vals = table.distinct_values(**dim);
            selected.is_empty() || !all_vals.iter().all(|v| selected.contains(v))
        })
        .map(|(dim, selected)| (*dim, selected))
        .collect();

    if active.iter().any(|(_, selected)| selected.is_empty()) {
        return Vec::new();
    }

    table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            active
                .iter()
                .all(|(dim, selected)| selected.iter().any(|v| dim.matches(rec, v)))
        })
        .map(|(i, _)| i)
        .collect()
}
