use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::filter::{init_filter_state, FilterState};
use crate::data::model::{Dimension, DimensionValue, SalaryTable};
use crate::pipeline::{self, Dashboard};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Shared handle to the cached source table.
    pub table: Arc<SalaryTable>,

    /// File the table was loaded from.
    pub source_path: PathBuf,

    /// Per-dimension filter selections.
    pub filters: FilterState,

    /// Output of the last pipeline run.
    pub dashboard: Dashboard,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, table: Arc<SalaryTable>) -> Self {
        let filters = init_filter_state(&table);
        let dashboard = pipeline::run(&table, &filters, &config);
        Self {
            source_path: config.data_path.clone(),
            config,
            table,
            filters,
            dashboard,
            status_message: None,
        }
    }

    /// Swap in a newly loaded table and reset selections to "everything".
    pub fn set_table(&mut self, path: PathBuf, table: Arc<SalaryTable>) {
        self.filters = init_filter_state(&table);
        self.table = table;
        self.source_path = path;
        self.status_message = None;
        self.rerun();
    }

    /// Recompute the dashboard after a selection change.
    pub fn rerun(&mut self) {
        if self.filters.values().any(BTreeSet::is_empty) {
            log::warn!("A filter has no values selected; the view is empty");
        }
        self.dashboard = pipeline::run(&self.table, &self.filters, &self.config);
    }

    pub fn is_selected(&self, dim: Dimension, value: &DimensionValue) -> bool {
        self.filters
            .get(&dim)
            .map_or(true, |selected| selected.contains(value))
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &DimensionValue) {
        let selected = self.filters.entry(dim).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.rerun();
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        let all_vals = self.table.distinct_values(dim).clone();
        self.filters.insert(dim, all_vals);
        self.rerun();
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.filters.insert(dim, BTreeSet::new());
        self.rerun();
    }
}
