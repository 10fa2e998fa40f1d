use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::present::{detail_row, DETAIL_HEADERS};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Detail table (bottom panel)
// ---------------------------------------------------------------------------

/// Every row of the filtered view, virtualised by `egui_extras`.
pub fn detail_table(ui: &mut Ui, state: &AppState) {
    ui.heading("Dados Detalhados");

    let rows = &state.dashboard.rows;
    if rows.is_empty() {
        ui.label("Nenhum registro corresponde aos filtros selecionados.");
        return;
    }
    let records = state.table.records();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0), DETAIL_HEADERS.len() - 1)
        .column(Column::remainder())
        .min_scrolled_height(0.0)
        .header(20.0, |mut header| {
            for title in DETAIL_HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let Some(rec) = rows.get(row.index()).and_then(|&i| records.get(i)) else {
                    return;
                };
                for cell in detail_row(rec) {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
