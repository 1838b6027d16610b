use std::borrow::Cow;
use std::collections::BTreeMap;

use super::model::{Dataset, KnownField};

// ---------------------------------------------------------------------------
// Range predicate
// ---------------------------------------------------------------------------

/// Inclusive numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// `[min, max]` over the non-null cells of a numeric column.
    /// `None` if the column is missing, textual, or entirely null.
    pub fn extent(dataset: &Dataset, column: &str) -> Option<Self> {
        let idx = dataset.numeric_column(column)?;
        dataset
            .rows
            .iter()
            .filter_map(|row| row[idx].as_f64())
            .fold(None, |acc: Option<Self>, v| {
                Some(match acc {
                    None => Self::new(v, v),
                    Some(r) => Self::new(r.min.min(v), r.max.max(v)),
                })
            })
    }
}

// ---------------------------------------------------------------------------
// Filter specification
// ---------------------------------------------------------------------------

/// Per-column range selections: column name → inclusive range.
/// Columns that are absent or not numeric in the dataset are ignored.
pub type FilterSpec = BTreeMap<String, NumericRange>;

/// A spec covering the full extent of every filterable field the dataset
/// carries as a numeric column (i.e. all sliders wide open).
pub fn init_filter_spec(dataset: &Dataset, fields: &[KnownField]) -> FilterSpec {
    fields
        .iter()
        .filter_map(|f| {
            let name = f.column_name();
            NumericRange::extent(dataset, name).map(|r| (name.to_string(), r))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// An order-preserving row subset of a [`Dataset`].
///
/// The row indices are either owned (fresh from [`filter`]) or borrowed
/// from a cached selection, so re-viewing cached rows does not copy them.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    rows: Cow<'a, [usize]>,
}

impl<'a> FilteredView<'a> {
    /// View over every row.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            rows: Cow::Owned((0..dataset.len()).collect()),
        }
    }

    /// Rebuild a view from indices previously produced by [`filter`].
    /// Accepts an owned `Vec` or a borrowed slice.
    pub fn from_rows(dataset: &'a Dataset, rows: impl Into<Cow<'a, [usize]>>) -> Self {
        let rows = rows.into();
        debug_assert!(rows.iter().all(|&r| r < dataset.len()));
        Self { dataset, rows }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Row indices into the dataset, ascending.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<usize> {
        self.rows.into_owned()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Non-null values of a numeric column, in view order.
    pub fn numbers(&self, column: &str) -> Vec<f64> {
        let Some(idx) = self.dataset.numeric_column(column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|&r| self.dataset.number(r, idx))
            .collect()
    }
}

/// Return the rows of `dataset` that satisfy every range in `spec`.
///
/// A row passes a column predicate when:
/// * the column is not a numeric column of the dataset → passes (ignored)
/// * the row's value is null → fails
/// * the row's value lies in the inclusive range → passes
pub fn filter<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredView<'a> {
    let predicates: Vec<(usize, NumericRange)> = spec
        .iter()
        .filter_map(|(col, range)| dataset.numeric_column(col).map(|idx| (idx, *range)))
        .collect();

    let rows: Vec<usize> = dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            predicates.iter().all(|(idx, range)| match row[*idx].as_f64() {
                Some(v) => range.contains(v),
                None => false,
            })
        })
        .map(|(i, _)| i)
        .collect();

    FilteredView {
        dataset,
        rows: Cow::Owned(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;
    use crate::data::model::{Column, ColumnKind, Value};

    fn masses(values: &[f64]) -> Dataset {
        Dataset::new(
            vec![Column { name: "Mass".into(), kind: ColumnKind::Numeric }],
            values.iter().map(|&v| vec![Value::Number(v)]).collect(),
        )
    }

    fn spec(entries: &[(&str, f64, f64)]) -> FilterSpec {
        entries
            .iter()
            .map(|&(c, lo, hi)| (c.to_string(), NumericRange::new(lo, hi)))
            .collect()
    }

    #[test]
    fn mass_range_keeps_matching_rows_in_order() {
        let ds = masses(&[1.0, 2.0, 3.0]);
        let view = filter(&ds, &spec(&[("Mass", 1.5, 3.0)]));
        assert_eq!(view.rows(), &[1, 2]);
        assert_eq!(view.numbers("Mass"), vec![2.0, 3.0]);
    }

    #[test]
    fn empty_spec_returns_everything() {
        let ds = sample_dataset();
        let view = filter(&ds, &FilterSpec::new());
        assert_eq!(view.rows(), &[0, 1, 2, 3]);
    }

    #[test]
    fn exact_extent_keeps_all_rows() {
        let ds = masses(&[3.0, 1.0, 2.0]);
        let extent = NumericRange::extent(&ds, "Mass").unwrap();
        assert_eq!(extent, NumericRange::new(1.0, 3.0));

        let mut s = FilterSpec::new();
        s.insert("Mass".into(), extent);
        assert_eq!(filter(&ds, &s).len(), 3);
    }

    #[test]
    fn wider_range_is_a_no_op() {
        let ds = masses(&[3.0, 1.0, 2.0]);
        let view = filter(&ds, &spec(&[("Mass", -100.0, 100.0)]));
        assert_eq!(view.rows(), &[0, 1, 2]);
    }

    #[test]
    fn rows_with_null_in_filtered_column_are_excluded() {
        let ds = sample_dataset();
        let view = filter(&ds, &spec(&[("Mass", 0.0, 10.0)]));
        assert_eq!(view.rows(), &[0, 1, 2]);
    }

    #[test]
    fn predicates_are_and_composed() {
        let ds = sample_dataset();
        let view = filter(
            &ds,
            &spec(&[("Mass", 1.5, 3.0), ("Orbital Period Days", 0.0, 4.0)]),
        );
        assert_eq!(view.rows(), &[1]);
    }

    #[test]
    fn unknown_and_text_columns_are_ignored() {
        let ds = sample_dataset();
        let view = filter(
            &ds,
            &spec(&[("Planet Name", 0.0, 0.0), ("Gaia Magnitude", 0.0, 0.0)]),
        );
        assert_eq!(view.len(), ds.len());
    }

    #[test]
    fn result_is_an_ordered_subset_for_many_ranges() {
        let ds = masses(&[5.0, 0.5, 3.2, 9.9, 3.2, 0.0, 7.1]);
        for lo in [0.0, 0.5, 3.0, 8.0] {
            for hi in [0.5, 3.2, 7.0, 10.0] {
                let view = filter(&ds, &spec(&[("Mass", lo, hi)]));
                assert!(view.rows().windows(2).all(|w| w[0] < w[1]));
                assert!(view.numbers("Mass").iter().all(|&m| m >= lo && m <= hi));
            }
        }
    }

    #[test]
    fn init_spec_covers_available_filter_fields() {
        let ds = sample_dataset();
        let s = init_filter_spec(&ds, &KnownField::FILTERABLE);
        assert_eq!(s.len(), 2);
        assert_eq!(s["Mass"], NumericRange::new(1.0, 3.0));
        assert_eq!(s["Orbital Period Days"], NumericRange::new(3.5, 37.4));
    }
}
