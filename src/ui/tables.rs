use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::generate_palette;
use crate::data::filter::FilteredView;
use crate::data::model::{Dataset, KnownField, Value};
use crate::data::stats::{SortOrder, Summary, describe, group_counts, top_n, value_counts};
use crate::state::AppState;

const SAMPLE_ROWS: usize = 5;
const TOP_N: usize = 5;

// ---------------------------------------------------------------------------
// Dataset overview
// ---------------------------------------------------------------------------

pub fn overview(ui: &mut Ui, dataset: &Dataset) {
    ui.heading("Dataset Overview");

    egui::CollapsingHeader::new("View Sample Data")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let rows: Vec<usize> = (0..dataset.len().min(SAMPLE_ROWS)).collect();
            ui.push_id("sample_table", |ui: &mut Ui| {
                ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
                    sample_table(ui, dataset, &rows);
                });
            });
        });

    egui::CollapsingHeader::new("View Summary Statistics")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ScrollArea::horizontal()
                .id_salt("summary_scroll")
                .show(ui, |ui: &mut Ui| summary_grid(ui, dataset));
        });
}

fn sample_table(ui: &mut Ui, dataset: &Dataset, rows: &[usize]) {
    let n_cols = dataset.columns.len();
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(60.0), n_cols)
        .header(20.0, |mut header| {
            for col in &dataset.columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(col.name.as_str());
                });
            }
        })
        .body(|mut body| {
            for &r in rows {
                body.row(18.0, |mut row| {
                    for c in 0..n_cols {
                        row.col(|ui: &mut Ui| {
                            ui.label(dataset.value(r, c).to_string());
                        });
                    }
                });
            }
        });
}

fn summary_grid(ui: &mut Ui, dataset: &Dataset) {
    let view = FilteredView::all(dataset);
    let summaries: Vec<(String, Summary)> = dataset
        .numeric_column_names()
        .into_iter()
        .filter_map(|c| describe(&view, &c).map(|s| (c, s)))
        .collect();

    let stat_rows: [(&str, fn(&Summary) -> String); 8] = [
        ("count", |s: &Summary| s.count.to_string()),
        ("mean", |s: &Summary| format!("{:.4}", s.mean)),
        ("std", |s: &Summary| format!("{:.4}", s.std)),
        ("min", |s: &Summary| format!("{:.4}", s.min)),
        ("25%", |s: &Summary| format!("{:.4}", s.q1)),
        ("50%", |s: &Summary| format!("{:.4}", s.median)),
        ("75%", |s: &Summary| format!("{:.4}", s.q3)),
        ("max", |s: &Summary| format!("{:.4}", s.max)),
    ];

    egui::Grid::new("summary_grid")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for (name, _) in &summaries {
                ui.strong(name.as_str());
            }
            ui.end_row();

            for (label, fmt) in stat_rows {
                ui.strong(label);
                for (_, s) in &summaries {
                    ui.label(fmt(s));
                }
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Interesting statistics (top-N lists)
// ---------------------------------------------------------------------------

pub fn interesting_statistics(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.view() else {
        return;
    };
    let dataset = view.dataset();

    ui.heading("Interesting Statistics");
    ui.columns(2, |cols| {
        if dataset.numeric_field(KnownField::Mass).is_some() {
            cols[0].strong("5 Most Massive Planets");
            top_table(&mut cols[0], &view, KnownField::Mass, SortOrder::Descending);
        }
        if dataset.numeric_field(KnownField::OrbitalPeriodDays).is_some() {
            cols[1].strong("5 Planets with Shortest Orbital Periods");
            top_table(&mut cols[1], &view, KnownField::OrbitalPeriodDays, SortOrder::Ascending);
        }
    });
}

fn top_table(ui: &mut Ui, view: &FilteredView<'_>, field: KnownField, order: SortOrder) {
    let dataset = view.dataset();
    let column = field.column_name();
    let (Some(value_idx), name_idx) = (
        dataset.numeric_column(column),
        dataset.column_index(KnownField::PlanetName.column_name()),
    ) else {
        return;
    };

    egui::Grid::new(("top", column))
        .striped(true)
        .num_columns(3)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            ui.strong(KnownField::PlanetName.column_name());
            ui.strong(column);
            ui.end_row();

            for (rank, r) in top_n(view, column, order, TOP_N).into_iter().enumerate() {
                ui.label(rank.to_string());
                ui.label(name_idx.map_or(Value::Null, |i| dataset.value(r, i).clone()).to_string());
                ui.label(dataset.value(r, value_idx).to_string());
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Discovery charts
// ---------------------------------------------------------------------------

pub fn additional_information(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.view() else {
        return;
    };
    let dataset = view.dataset();

    ui.heading("Additional Information");
    if view.is_empty() {
        ui.label("No exoplanets match the current filters.");
        return;
    }

    if dataset.has_field(KnownField::DiscoveryMethod) {
        ui.strong("Discovery Methods");
        discovery_methods(ui, &view);
        ui.add_space(12.0);
    }

    if dataset.has_field(KnownField::DiscoveryYear) {
        ui.strong("Discoveries Over Time");
        discoveries_by_year(ui, &view);
    }
}

fn discovery_methods(ui: &mut Ui, view: &FilteredView<'_>) {
    let counts = value_counts(view, KnownField::DiscoveryMethod.column_name());
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    let palette = generate_palette(counts.len());

    ui.horizontal_top(|ui: &mut Ui| {
        egui::Grid::new("method_legend")
            .striped(true)
            .show(ui, |ui: &mut Ui| {
                ui.strong("Method");
                ui.strong("Count");
                ui.strong("Share");
                ui.end_row();
                for ((method, count), color) in counts.iter().zip(&palette) {
                    ui.label(RichText::new(method.to_string()).color(*color));
                    ui.label(count.to_string());
                    ui.label(format!("{:.1}%", 100.0 * *count as f64 / total.max(1) as f64));
                    ui.end_row();
                }
            });

        let bars: Vec<Bar> = counts
            .iter()
            .zip(&palette)
            .enumerate()
            .map(|(i, ((method, count), color))| {
                Bar::new(i as f64, *count as f64)
                    .name(method.to_string())
                    .fill(*color)
                    .width(0.8)
            })
            .collect();

        Plot::new("discovery_methods")
            .height(260.0)
            .y_axis_label("Count")
            .show_axes([false, true])
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Exoplanet Discovery Methods"));
            });
    });
}

fn discoveries_by_year(ui: &mut Ui, view: &FilteredView<'_>) {
    let groups = group_counts(view, KnownField::DiscoveryYear.column_name());
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, (year, count))| {
            let x = year.as_f64().unwrap_or(i as f64);
            Bar::new(x, *count as f64).name(year.to_string()).width(0.8)
        })
        .collect();

    Plot::new("discoveries_by_year")
        .height(260.0)
        .x_axis_label(KnownField::DiscoveryYear.column_name())
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(egui::Color32::LIGHT_BLUE)
                    .name("Exoplanet Discoveries by Year"),
            );
        });
}
