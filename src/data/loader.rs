use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::{Column, ColumnKind, Dataset, Value};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read an exoplanet table from a CSV file with a header row.
pub fn read_csv(path: &Path) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_csv_from(file).with_context(|| format!("parsing {}", path.display()))
}

/// Write `dataset` as CSV so that [`read_csv`] yields an equal table.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv_to(dataset, file).with_context(|| format!("writing {}", path.display()))
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Parse CSV text. Every record must have as many fields as the header.
///
/// Column kinds are inferred after reading all rows: a column is numeric
/// when it has at least one non-missing cell and every non-missing cell
/// parses as a float. Missing cells (empty or an NA token) are null in both
/// kinds.
pub fn read_csv_from<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        bail!("CSV has no header row");
    }

    let mut raw: Vec<csv::StringRecord> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        raw.push(result.with_context(|| format!("CSV row {row_no}"))?);
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .enumerate()
        .map(|(idx, name)| Column {
            kind: infer_kind(raw.iter().map(|r| r.get(idx).unwrap_or(""))),
            name,
        })
        .collect();

    let rows = raw
        .iter()
        .map(|record| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, col)| parse_cell(record.get(idx).unwrap_or(""), col.kind))
                .collect()
        })
        .collect();

    Ok(Dataset::new(columns, rows))
}

/// Tokens read as a missing value in any column, matching the default NA
/// set of dataframe CSV readers.
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(s: &str) -> bool {
    NA_TOKENS.contains(&s) || s.trim().parse::<f64>().is_ok_and(f64::is_nan)
}

/// A column is numeric when it has at least one value and every
/// non-missing cell parses. All-missing columns are text, so that a
/// column written back as empty cells reads the same kind again.
fn infer_kind<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut seen_value = false;
    for cell in cells.filter(|c| !is_missing(c)) {
        if parse_number(cell).is_none() {
            return ColumnKind::Text;
        }
        seen_value = true;
    }
    if seen_value {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

fn parse_cell(s: &str, kind: ColumnKind) -> Value {
    if is_missing(s) {
        return Value::Null;
    }
    match kind {
        ColumnKind::Numeric => parse_number(s).map_or(Value::Null, Value::Number),
        ColumnKind::Text => Value::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

pub fn write_csv_to<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(dataset.columns.iter().map(|c| c.name.as_str()))
        .context("writing CSV header")?;

    for (row_no, row) in dataset.rows.iter().enumerate() {
        writer
            .write_record(row.iter().map(format_cell))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Cache representation of a cell. `f64` `Display` is the shortest string
/// that parses back to the same value.
fn format_cell(value: &Value) -> String {
    match value {
        Value::Number(v) => v.to_string(),
        Value::Text(s) => s.clone(),
        Value::Null => String::new(),
    }
}
