use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell of the exoplanet table
// ---------------------------------------------------------------------------

/// A typed cell. Numeric columns only ever hold `Number` or `Null`,
/// text columns only `Text` or `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Null,
}

// -- Manual Eq/Ord so values can key a BTreeMap (grouped counts) --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Number(_) => 0,
                Value::Text(_) => 1,
                Value::Null => 2,
            }
        }
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Years and counts read better without a fractional part.
            Value::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            Value::Number(v) => write!(f, "{v:.4}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Null => write!(f, "–"),
        }
    }
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

// ---------------------------------------------------------------------------
// KnownField – the columns the dashboard has features for
// ---------------------------------------------------------------------------

/// Fields of the all-exoplanets dataset that individual dashboard features
/// depend on. A feature whose field is absent from the loaded table is
/// skipped; nothing else about the table is assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownField {
    RowNumber,
    PlanetName,
    Mass,
    StellarRadius,
    OrbitalPeriodDays,
    EquilibriumTemperature,
    Distance,
    DiscoveryMethod,
    DiscoveryYear,
}

impl KnownField {
    /// Numeric fields offered as range filters, in sidebar order.
    pub const FILTERABLE: [KnownField; 5] = [
        KnownField::Mass,
        KnownField::StellarRadius,
        KnownField::OrbitalPeriodDays,
        KnownField::EquilibriumTemperature,
        KnownField::Distance,
    ];

    /// Exact CSV header of the field.
    pub const fn column_name(self) -> &'static str {
        match self {
            KnownField::RowNumber => "No.",
            KnownField::PlanetName => "Planet Name",
            KnownField::Mass => "Mass",
            KnownField::StellarRadius => "Stellar Radius",
            KnownField::OrbitalPeriodDays => "Orbital Period Days",
            KnownField::EquilibriumTemperature => "Equilibrium Temperature",
            KnownField::Distance => "Distance",
            KnownField::DiscoveryMethod => "Discovery Method",
            KnownField::DiscoveryYear => "Discovery Year",
        }
    }

    /// Human label including units, used by filter widgets.
    pub const fn label(self) -> &'static str {
        match self {
            KnownField::Mass => "Planet Mass (Jupiter masses)",
            KnownField::StellarRadius => "Stellar Radius (Solar radii)",
            KnownField::OrbitalPeriodDays => "Orbital Period (days)",
            KnownField::EquilibriumTemperature => "Equilibrium Temperature (K)",
            KnownField::Distance => "Distance (parsecs)",
            other => other.column_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full exoplanet table. Immutable once built; filtering works on row
/// indices into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub columns: Vec<Column>,
    /// Row-major cells; every row has exactly `columns.len()` entries.
    pub rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    /// Number of planets (rows).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Index of `name` only if it is a numeric column.
    pub fn numeric_column(&self, name: &str) -> Option<usize> {
        self.column_index(name)
            .filter(|&i| self.columns[i].kind == ColumnKind::Numeric)
    }

    /// Whether the table carries `field` at all.
    pub fn has_field(&self, field: KnownField) -> bool {
        self.column_index(field.column_name()).is_some()
    }

    /// Column index of `field` if the table carries it as a numeric column.
    pub fn numeric_field(&self, field: KnownField) -> Option<usize> {
        self.numeric_column(field.column_name())
    }

    /// Names of all numeric columns in header order.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn value(&self, row: usize, column: usize) -> &Value {
        &self.rows[row][column]
    }

    pub fn number(&self, row: usize, column: usize) -> Option<f64> {
        self.value(row, column).as_f64()
    }
}
