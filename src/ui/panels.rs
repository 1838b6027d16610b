use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::NumericRange;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – range filters
// ---------------------------------------------------------------------------

/// Render the "Filter Data" panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // Clone so sliders can mutate state inside the loop.
            let extents = state.filter_extents.clone();
            for (field, extent) in extents {
                let name = field.column_name();
                let Some(mut range) = state.filters.get(name).copied() else {
                    continue;
                };

                ui.strong(field.label());
                let mut changed = false;
                changed |= ui
                    .add(egui::Slider::new(&mut range.min, extent.min..=extent.max).text("min"))
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut range.max, extent.min..=extent.max).text("max"))
                    .changed();
                if ui.small_button("Reset").clicked() {
                    range = extent;
                    changed = true;
                }
                if changed {
                    state.set_range(field, NumericRange::new(range.min, range.max));
                }
                ui.add_space(6.0);
            }

            ui.separator();
            metric(ui, "Filtered Exoplanets", state.visible_rows.len());
            metric(ui, "Total Exoplanets", dataset.len());
        });
}

fn metric(ui: &mut Ui, label: &str, value: usize) {
    ui.label(RichText::new(label).small());
    ui.label(RichText::new(value.to_string()).heading());
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with counts and status.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("🪐 Exoplanet Explorer");
        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} exoplanets loaded, {} visible",
                ds.len(),
                state.visible_rows.len()
            ));
            ui.separator();
        }

        if let Some(err) = &state.load_error {
            ui.label(RichText::new(err).color(Color32::RED));
        } else if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).weak());
        }
    });
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

pub fn footer(ui: &mut Ui) {
    ui.horizontal_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new(
                "Exoplanet Explorer | Data source: Kaggle - All Exoplanets Dataset by Shivam Bansal",
            )
            .small()
            .weak(),
        );
    });
}

/// Shown in place of the dashboard when no data could be loaded.
pub fn load_failure(ui: &mut Ui, message: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new(message).color(Color32::RED));
            ui.label("Failed to load the dataset. Please check your internet connection and try again.");
        });
    });
}
