use std::sync::Arc;

use crate::data::filter::{FilterSpec, FilteredView, NumericRange, filter, init_filter_spec};
use crate::data::model::{Dataset, KnownField};
use crate::provider::{DataSource, Loaded};

// ---------------------------------------------------------------------------
// Chart selections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistributionTab {
    #[default]
    Histogram,
    BoxPlot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSettings {
    pub x: String,
    pub y: String,
    /// Numeric column driving point colour; `None` for a single colour.
    pub color_by: Option<String>,
    pub log_x: bool,
    pub log_y: bool,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None if loading failed).
    pub dataset: Option<Arc<Dataset>>,

    /// Full extent of each available filter field, in sidebar order.
    pub filter_extents: Vec<(KnownField, NumericRange)>,

    /// Current slider positions.
    pub filters: FilterSpec,

    /// Rows passing the current filters (cached).
    pub visible_rows: Vec<usize>,

    /// Numeric columns offered on chart axes (excludes the row number).
    pub plot_columns: Vec<String>,

    pub scatter: Option<ScatterSettings>,
    pub distribution_tab: DistributionTab,
    pub histogram_column: Option<String>,
    pub histogram_log_y: bool,
    pub box_column: Option<String>,

    /// Informational message shown in the top bar.
    pub status_message: Option<String>,

    /// Terminal load failure shown instead of the dashboard.
    pub load_error: Option<String>,
}

impl AppState {
    /// Ingest the loaded dataset and reset filters and chart selections.
    pub fn set_loaded(&mut self, loaded: Loaded) {
        self.status_message = Some(match loaded.source {
            DataSource::Cache => format!("{} exoplanets loaded from local cache", loaded.dataset.len()),
            DataSource::Download { replaced_cache: false } => {
                format!("{} exoplanets downloaded and cached", loaded.dataset.len())
            }
            DataSource::Download { replaced_cache: true } => format!(
                "{} exoplanets downloaded; the unreadable local cache was replaced",
                loaded.dataset.len()
            ),
        });
        self.set_dataset(loaded.dataset);
    }

    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.filters = init_filter_spec(&dataset, &KnownField::FILTERABLE);
        self.filter_extents = KnownField::FILTERABLE
            .iter()
            .filter_map(|&f| self.filters.get(f.column_name()).map(|r| (f, *r)))
            .collect();

        let row_number = KnownField::RowNumber.column_name();
        self.plot_columns = dataset
            .numeric_column_names()
            .into_iter()
            .filter(|c| c != row_number)
            .collect();

        self.scatter = default_scatter(&self.plot_columns);
        self.histogram_column = self.plot_columns.first().cloned();
        self.box_column = self.plot_columns.first().cloned();
        self.histogram_log_y = false;

        self.dataset = Some(dataset);
        self.load_error = None;
        self.refilter();
    }

    pub fn set_load_error(&mut self, message: String) {
        self.dataset = None;
        self.visible_rows.clear();
        self.load_error = Some(message);
    }

    /// Recompute `visible_rows` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_rows = filter(ds, &self.filters).into_rows();
            log::debug!("{} of {} exoplanets visible", self.visible_rows.len(), ds.len());
        }
    }

    /// Move one field's slider pair. `min > max` is corrected by swapping.
    pub fn set_range(&mut self, field: KnownField, range: NumericRange) {
        let range = if range.min > range.max {
            NumericRange::new(range.max, range.min)
        } else {
            range
        };
        self.filters.insert(field.column_name().to_string(), range);
        self.refilter();
    }

    /// The current selection, borrowing the cached rows.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        let ds = self.dataset.as_deref()?;
        Some(FilteredView::from_rows(ds, self.visible_rows.as_slice()))
    }
}

/// X defaults to the orbital period, Y to mass, falling back to the first
/// and second plottable columns.
fn default_scatter(columns: &[String]) -> Option<ScatterSettings> {
    let pick = |field: KnownField, fallback: usize| {
        let name = field.column_name();
        columns
            .iter()
            .find(|c| *c == name)
            .or_else(|| columns.get(fallback))
            .cloned()
    };
    let x = pick(KnownField::OrbitalPeriodDays, 0)?;
    let y = pick(KnownField::Mass, 1.min(columns.len().saturating_sub(1)))?;
    Some(ScatterSettings {
        x,
        y,
        color_by: None,
        log_x: true,
        log_y: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv_from;
    use crate::data::model::tests::sample_dataset;

    fn state_with(ds: Dataset) -> AppState {
        let mut state = AppState::default();
        state.set_dataset(Arc::new(ds));
        state
    }

    #[test]
    fn wide_open_filters_drop_only_rows_missing_filtered_values() {
        let state = state_with(sample_dataset());
        // Row 3 has no mass, so the full-extent Mass slider excludes it.
        assert_eq!(state.visible_rows, vec![0, 1, 2]);
        assert_eq!(state.filter_extents.len(), 2);
    }

    #[test]
    fn narrowing_a_slider_refilters() {
        let mut state = state_with(sample_dataset());
        state.set_range(KnownField::Mass, NumericRange::new(1.5, 3.0));
        assert_eq!(state.visible_rows, vec![1, 2]);
        assert_eq!(state.view().unwrap().len(), 2);
    }

    #[test]
    fn view_borrows_the_cached_rows() {
        let state = state_with(sample_dataset());
        let view = state.view().unwrap();
        assert_eq!(view.rows(), state.visible_rows.as_slice());
        assert_eq!(view.rows().as_ptr(), state.visible_rows.as_ptr());
    }

    #[test]
    fn inverted_range_is_swapped() {
        let mut state = state_with(sample_dataset());
        state.set_range(KnownField::Mass, NumericRange::new(3.0, 1.5));
        assert_eq!(state.filters["Mass"], NumericRange::new(1.5, 3.0));
    }

    #[test]
    fn scatter_defaults_prefer_known_axes() {
        let state = state_with(sample_dataset());
        let s = state.scatter.unwrap();
        assert_eq!(s.x, "Orbital Period Days");
        assert_eq!(s.y, "Mass");
        assert!(s.log_x && s.log_y);
        assert_eq!(s.color_by, None);
    }

    #[test]
    fn scatter_defaults_fall_back_by_position() {
        let ds = read_csv_from("No.,Radius,Flux\n1,2.0,3.0\n".as_bytes()).unwrap();
        let state = state_with(ds);
        assert_eq!(state.plot_columns, vec!["Radius", "Flux"]);
        let s = state.scatter.unwrap();
        assert_eq!((s.x.as_str(), s.y.as_str()), ("Radius", "Flux"));
    }

    #[test]
    fn single_plot_column_is_used_for_both_axes() {
        let ds = read_csv_from("Radius,Name\n2.0,a\n".as_bytes()).unwrap();
        let s = state_with(ds).scatter.unwrap();
        assert_eq!((s.x.as_str(), s.y.as_str()), ("Radius", "Radius"));
    }

    #[test]
    fn load_error_clears_dataset() {
        let mut state = state_with(sample_dataset());
        state.set_load_error("boom".into());
        assert!(state.dataset.is_none());
        assert!(state.view().is_none());
        assert_eq!(state.load_error.as_deref(), Some("boom"));
    }
}
