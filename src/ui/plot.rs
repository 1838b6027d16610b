use eframe::egui::{self, Color32, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};

use crate::color::ColorScale;
use crate::data::filter::NumericRange;
use crate::data::model::KnownField;
use crate::data::stats::{box_stats, histogram};
use crate::state::{AppState, DistributionTab};

const COLOR_BANDS: usize = 8;
const HISTOGRAM_BINS: usize = 30;
const PLOT_HEIGHT: f32 = 360.0;

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

pub(super) fn column_selector(
    ui: &mut Ui,
    id: &str,
    label: &str,
    columns: &[String],
    selected: &mut String,
) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for col in columns {
                ui.selectable_value(selected, col.clone(), col.as_str());
            }
        });
}

fn color_selector(ui: &mut Ui, columns: &[String], selected: &mut Option<String>) {
    ui.label("Color by");
    egui::ComboBox::from_id_salt("scatter_color")
        .selected_text(selected.as_deref().unwrap_or("None"))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(selected, None, "None");
            for col in columns {
                ui.selectable_value(selected, Some(col.clone()), col.as_str());
            }
        });
}

/// Axis coordinate of a raw value; log axes drop non-positive values.
fn axis_value(v: f64, log: bool) -> Option<f64> {
    if !log {
        Some(v)
    } else if v > 0.0 {
        Some(v.log10())
    } else {
        None
    }
}

fn axis_label(column: &str, log: bool) -> String {
    if log {
        format!("log10({column})")
    } else {
        column.to_string()
    }
}

// ---------------------------------------------------------------------------
// Scatter plot
// ---------------------------------------------------------------------------

/// A plotted point with what the hover label needs.
struct Hover {
    at: [f64; 2],
    raw: [f64; 2],
    name: Option<String>,
}

/// Render the property-vs-property scatter plot.
pub fn scatter_plot(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Relationship Between Exoplanet Properties");

    let Some(dataset) = state.dataset.clone() else {
        return;
    };
    let Some(mut settings) = state.scatter.clone() else {
        ui.label("No numeric columns to plot.");
        return;
    };

    let columns = state.plot_columns.clone();
    ui.horizontal(|ui: &mut Ui| {
        column_selector(ui, "scatter_x", "X-axis", &columns, &mut settings.x);
        column_selector(ui, "scatter_y", "Y-axis", &columns, &mut settings.y);
        color_selector(ui, &columns, &mut settings.color_by);
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.checkbox(&mut settings.log_x, "Log scale (X-axis)");
        ui.checkbox(&mut settings.log_y, "Log scale (Y-axis)");
    });
    state.scatter = Some(settings.clone());

    let (Some(x_idx), Some(y_idx)) = (
        dataset.numeric_column(&settings.x),
        dataset.numeric_column(&settings.y),
    ) else {
        return;
    };
    let name_idx = dataset.column_index(KnownField::PlanetName.column_name());

    // Colour column index plus a scale over its full extent.
    let coloring = settings.color_by.as_deref().and_then(|col| {
        let idx = dataset.numeric_column(col)?;
        let r = NumericRange::extent(&dataset, col)?;
        Some((idx, ColorScale::new(r.min, r.max)))
    });

    let mut bands: Vec<Vec<[f64; 2]>> = vec![Vec::new(); COLOR_BANDS];
    let mut uncolored: Vec<[f64; 2]> = Vec::new();
    let mut hovers: Vec<Hover> = Vec::new();

    for &r in &state.visible_rows {
        let (Some(x), Some(y)) = (dataset.number(r, x_idx), dataset.number(r, y_idx)) else {
            continue;
        };
        let (Some(px), Some(py)) = (axis_value(x, settings.log_x), axis_value(y, settings.log_y))
        else {
            continue;
        };

        match coloring.and_then(|(c, scale)| Some(scale.bucket(dataset.number(r, c)?, COLOR_BANDS))) {
            Some(band) => bands[band].push([px, py]),
            None => uncolored.push([px, py]),
        }
        hovers.push(Hover {
            at: [px, py],
            raw: [x, y],
            name: name_idx.map(|i| dataset.value(r, i).to_string()),
        });
    }

    let x_name = settings.x.clone();
    let y_name = settings.y.clone();
    let title = format!("{} vs {}", settings.y, settings.x);
    ui.label(egui::RichText::new(title).strong());

    Plot::new("scatter_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(axis_label(&settings.x, settings.log_x))
        .y_axis_label(axis_label(&settings.y, settings.log_y))
        .label_formatter(move |_series, value| {
            let nearest = hovers.iter().min_by(|a, b| {
                let da = (a.at[0] - value.x).powi(2) + (a.at[1] - value.y).powi(2);
                let db = (b.at[0] - value.x).powi(2) + (b.at[1] - value.y).powi(2);
                da.total_cmp(&db)
            });
            match nearest {
                Some(h) if (h.at[0] - value.x).abs() < 1e-9 && (h.at[1] - value.y).abs() < 1e-9 => {
                    let head = h.name.as_deref().map(|n| format!("{n}\n")).unwrap_or_default();
                    format!("{head}{x_name}: {:.4}\n{y_name}: {:.4}", h.raw[0], h.raw[1])
                }
                _ => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            if let Some((_, scale)) = coloring {
                let col = settings.color_by.as_deref().unwrap_or_default();
                for (i, band) in bands.into_iter().enumerate() {
                    if band.is_empty() {
                        continue;
                    }
                    let lo = scale.min + (scale.max - scale.min) * i as f64 / COLOR_BANDS as f64;
                    let hi = scale.min + (scale.max - scale.min) * (i + 1) as f64 / COLOR_BANDS as f64;
                    let t = (i as f64 + 0.5) / COLOR_BANDS as f64;
                    plot_ui.points(
                        Points::new(PlotPoints::from(band))
                            .name(format!("{col} {lo:.3} – {hi:.3}"))
                            .color(scale.color_at(t))
                            .radius(2.5),
                    );
                }
            }
            if !uncolored.is_empty() {
                let name = if coloring.is_some() { "no value" } else { "exoplanets" };
                plot_ui.points(
                    Points::new(PlotPoints::from(uncolored))
                        .name(name)
                        .color(if coloring.is_some() { Color32::GRAY } else { Color32::LIGHT_BLUE })
                        .radius(2.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Distributions (histogram / box plot)
// ---------------------------------------------------------------------------

pub fn distribution_tabs(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Distribution of Exoplanet Properties");

    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.distribution_tab, DistributionTab::Histogram, "Histogram");
        ui.selectable_value(&mut state.distribution_tab, DistributionTab::BoxPlot, "Box Plot");
    });
    ui.separator();

    match state.distribution_tab {
        DistributionTab::Histogram => histogram_tab(ui, state),
        DistributionTab::BoxPlot => box_plot_tab(ui, state),
    }
}

/// Log bars are shifted by one so a single-row bin stays visible.
fn bar_height(count: usize, log: bool) -> f64 {
    if log {
        (count as f64 + 1.0).log10()
    } else {
        count as f64
    }
}

fn histogram_tab(ui: &mut Ui, state: &mut AppState) {
    let Some(mut column) = state.histogram_column.clone() else {
        ui.label("No numeric columns to plot.");
        return;
    };
    let columns = state.plot_columns.clone();
    ui.horizontal(|ui: &mut Ui| {
        column_selector(ui, "hist_select", "Select property for histogram", &columns, &mut column);
        ui.checkbox(&mut state.histogram_log_y, "Log scale (Y-axis)");
    });
    state.histogram_column = Some(column.clone());

    let Some(view) = state.view() else {
        return;
    };
    let log_y = state.histogram_log_y;
    let bars: Vec<Bar> = histogram(&view.numbers(&column), HISTOGRAM_BINS)
        .into_iter()
        .filter(|b| b.count > 0)
        .map(|b| {
            let height = bar_height(b.count, log_y);
            let width = (b.end - b.start).max(f64::EPSILON);
            Bar::new((b.start + b.end) / 2.0, height)
                .width(width)
                .name(format!("{:.3} – {:.3}: {}", b.start, b.end, b.count))
        })
        .collect();

    ui.label(egui::RichText::new(format!("Distribution of {column}")).strong());
    Plot::new("histogram_plot")
        .height(PLOT_HEIGHT)
        .x_axis_label(column.as_str())
        .y_axis_label(if log_y { "log10(count + 1)" } else { "count" })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE).name(&column));
        });
}

fn box_plot_tab(ui: &mut Ui, state: &mut AppState) {
    let Some(mut column) = state.box_column.clone() else {
        ui.label("No numeric columns to plot.");
        return;
    };
    let columns = state.plot_columns.clone();
    column_selector(ui, "box_select", "Select property for box plot", &columns, &mut column);
    state.box_column = Some(column.clone());

    let Some(view) = state.view() else {
        return;
    };
    let Some(stats) = box_stats(&view.numbers(&column)) else {
        ui.label(format!("No values of {column} in the filtered data."));
        return;
    };

    ui.label(egui::RichText::new(format!("Box Plot of {column}")).strong());
    let elem = BoxElem::new(
        0.0,
        BoxSpread::new(
            stats.lower_whisker,
            stats.q1,
            stats.median,
            stats.q3,
            stats.upper_whisker,
        ),
    )
    .name(&column)
    .box_width(0.5);

    Plot::new("box_plot")
        .height(PLOT_HEIGHT)
        .y_axis_label(column.as_str())
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![elem]).color(Color32::LIGHT_BLUE));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_axis_drops_non_positive_values() {
        assert_eq!(axis_value(100.0, true), Some(2.0));
        assert_eq!(axis_value(0.0, true), None);
        assert_eq!(axis_value(-3.0, false), Some(-3.0));
        assert_eq!(axis_label("Mass", true), "log10(Mass)");
    }

    #[test]
    fn log_histogram_keeps_single_row_bins_visible() {
        assert!(bar_height(1, true) > 0.0);
        assert!(bar_height(2, true) > bar_height(1, true));
        assert_eq!(bar_height(9, true), 1.0);
        assert_eq!(bar_height(1, false), 1.0);
    }
}
