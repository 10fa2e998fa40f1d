use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader::load_cached;
use crate::data::model::{Dimension, DimensionValue};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: one multi-select per dimension.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Filtros");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::ALL {
                // Cloned up front so the selection can be mutated while listing.
                let all_values: Vec<DimensionValue> =
                    state.table.distinct_values(dim).iter().cloned().collect();
                let n_selected = all_values
                    .iter()
                    .filter(|v| state.is_selected(dim, v))
                    .count();
                let header_text = format!("{dim}  ({n_selected}/{})", all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("Todos").clicked() {
                                state.select_all(dim);
                            }
                            if ui.small_button("Nenhum").clicked() {
                                state.select_none(dim);
                            }
                        });

                        for val in &all_values {
                            let mut checked = state.is_selected(dim, val);
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                state.toggle_filter_value(dim, val);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{}: {} registros carregados, {} visíveis",
            state.source_path.display(),
            state.table.len(),
            state.dashboard.rows.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    ui.heading("Métricas gerais (Salário anual em USD)");
    ui.columns(state.dashboard.metrics.len(), |cols: &mut [Ui]| {
        for (col, card) in cols.iter_mut().zip(&state.dashboard.metrics) {
            col.label(RichText::new(card.label).weak());
            col.label(RichText::new(&card.value).size(26.0).strong());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir dados salariais")
        .add_filter("Arquivos suportados", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match load_cached(&path) {
            Ok(table) => state.set_table(path, table),
            Err(e) => {
                // The current table stays active.
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Erro: {e}"));
            }
        }
    }
}
