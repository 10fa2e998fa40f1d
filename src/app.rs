use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalaryPandaApp {
    pub state: AppState,
}

impl SalaryPandaApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SalaryPandaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: detail table ----
        egui::TopBottomPanel::bottom("detail_panel")
            .default_height(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                table::detail_table(ui, &self.state);
            });

        // ---- Central panel: metrics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading("📊 Dashboard de Análise de Salários na Área de Dados");
                    ui.label(
                        "Explore os dados salariais na área de dados nos últimos anos. \
                         Utilize os filtros à esquerda para refinar a sua análise.",
                    );
                    ui.add_space(8.0);

                    panels::metrics_row(ui, &self.state);
                    ui.separator();
                    ui.heading("Gráficos");

                    let dash = &self.state.dashboard;
                    ui.columns(2, |cols: &mut [Ui]| {
                        charts::top_titles(&mut cols[0], &dash.top_titles);
                        charts::salary_histogram(&mut cols[1], &dash.salary_histogram);
                    });
                    ui.columns(2, |cols: &mut [Ui]| {
                        charts::remote_mix(&mut cols[0], &dash.remote_mix);
                        charts::country_map(&mut cols[1], &dash.country_map);
                    });
                });
        });
    }
}
