use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::filter::FilteredView;
use super::model::Value;

// ---------------------------------------------------------------------------
// Top-N
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// The first `n` rows of the view sorted by a numeric column.
///
/// The sort is stable and rows with a null value go last regardless of
/// `order`. Returns nothing when `column` is not numeric.
pub fn top_n(view: &FilteredView<'_>, column: &str, order: SortOrder, n: usize) -> Vec<usize> {
    let ds = view.dataset();
    let Some(idx) = ds.numeric_column(column) else {
        return Vec::new();
    };

    let mut keyed: Vec<(usize, Option<f64>)> = view
        .rows()
        .iter()
        .map(|&r| (r, ds.number(r, idx)))
        .collect();

    keyed.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Ascending => a.total_cmp(b),
            SortOrder::Descending => b.total_cmp(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().take(n).map(|(r, _)| r).collect()
}

// ---------------------------------------------------------------------------
// Grouped counts
// ---------------------------------------------------------------------------

/// Count of each distinct non-null value, most frequent first. Ties keep
/// the order in which the values first appear in the view.
pub fn value_counts(view: &FilteredView<'_>, column: &str) -> Vec<(Value, usize)> {
    let ds = view.dataset();
    let Some(idx) = ds.column_index(column) else {
        return Vec::new();
    };

    // value → (first seen position, count)
    let mut counts: BTreeMap<&Value, (usize, usize)> = BTreeMap::new();
    for (pos, &r) in view.rows().iter().enumerate() {
        let v = ds.value(r, idx);
        if v.is_null() {
            continue;
        }
        counts.entry(v).or_insert((pos, 0)).1 += 1;
    }

    let mut out: Vec<(usize, Value, usize)> = counts
        .into_iter()
        .map(|(v, (first, count))| (first, v.clone(), count))
        .collect();
    out.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
    out.into_iter().map(|(_, v, c)| (v, c)).collect()
}

/// Count of each distinct non-null value, ordered by value ascending.
pub fn group_counts(view: &FilteredView<'_>, column: &str) -> Vec<(Value, usize)> {
    let ds = view.dataset();
    let Some(idx) = ds.column_index(column) else {
        return Vec::new();
    };

    let mut groups: BTreeMap<Value, usize> = BTreeMap::new();
    for &r in view.rows() {
        let v = ds.value(r, idx);
        if !v.is_null() {
            *groups.entry(v.clone()).or_default() += 1;
        }
    }
    groups.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Column summary in the shape of a dataframe `describe()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN for a single value.
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

pub fn describe(view: &FilteredView<'_>, column: &str) -> Option<Summary> {
    summarize(&view.numbers(column))
}

pub fn summarize(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted_copy(values);
    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    Some(Summary {
        count: n,
        mean,
        std,
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Linear-interpolated quantile of already sorted, non-empty data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

// ---------------------------------------------------------------------------
// Chart helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width bins spanning the extent of `values`. The last bin is closed
/// on the right so the maximum is counted.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin { start: min, end: max, count: values.len() }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for &v in values {
        let i = (((v - min) / width).floor() as usize).min(bins - 1);
        out[i].count += 1;
    }
    out
}

/// Box-plot geometry: quartiles plus whiskers at the furthest data points
/// within 1.5 × IQR of the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted_copy(values);
    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;

    let lower_whisker = sorted.iter().copied().find(|&v| v >= lo_fence).unwrap_or(q1);
    let upper_whisker = sorted.iter().rev().copied().find(|&v| v <= hi_fence).unwrap_or(q3);

    Some(BoxStats { lower_whisker, q1, median, q3, upper_whisker })
}
