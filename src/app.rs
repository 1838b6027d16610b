use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExplorerApp {
    pub state: AppState,
}

impl ExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Bottom panel: attribution ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui);
        });

        // ---- Left side panel: range filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(err) = &self.state.load_error {
                panels::load_failure(ui, err);
                return;
            }
            let Some(dataset) = self.state.dataset.clone() else {
                return;
            };
            if dataset.is_empty() {
                ui.label("The dataset has no rows.");
                return;
            }

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.label("Explore and visualize data from thousands of confirmed exoplanets.");
                    tables::overview(ui, &dataset);
                    ui.separator();

                    ui.heading("Exoplanet Visualizations");
                    plot::scatter_plot(ui, &mut self.state);
                    ui.separator();
                    plot::distribution_tabs(ui, &mut self.state);
                    ui.separator();

                    tables::interesting_statistics(ui, &self.state);
                    ui.separator();
                    tables::additional_information(ui, &self.state);
                });
        });
    }
}
