use crate::config::DashboardConfig;
use crate::data::aggregate::{self, Summary};
use crate::data::filter::{filtered_indices, FilterState};
use crate::data::model::SalaryTable;
use crate::present::{
    self, BarSpec, ChoroplethSpec, HistogramSpec, MetricCard, Panel, PieSpec,
};

// ---------------------------------------------------------------------------
// One render cycle: filter → aggregate → present
// ---------------------------------------------------------------------------

/// Everything the UI draws for one filter selection. Rebuilt from scratch on
/// every interaction and dropped on the next.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Indices into the source table of the filtered view, in table order.
    pub rows: Vec<usize>,
    pub summary: Summary,
    pub metrics: [MetricCard; 4],
    pub top_titles: Panel<BarSpec>,
    pub salary_histogram: Panel<HistogramSpec>,
    pub remote_mix: Panel<PieSpec>,
    pub country_map: Panel<ChoroplethSpec>,
}

/// Run the whole pipeline for the given selection.
pub fn run(table: &SalaryTable, filters: &FilterState, config: &DashboardConfig) -> Dashboard {
    let rows = filtered_indices(table, filters);
    let view = table.view(&rows);
    log::debug!("Pipeline run: {} of {} records visible", view.len(), table.len());

    let summary = aggregate::summarize(&view);
    Dashboard {
        metrics: present::metric_cards(&summary),
        top_titles: present::top_titles_chart(&view, config.top_n),
        salary_histogram: present::histogram_chart(&view, config.histogram_bins),
        remote_mix: present::remote_mix_chart(&view),
        country_map: present::role_choropleth(&view, &config.focus_role),
        summary,
        rows,
    }
}
