/// Data layer: table model, CSV cache format, filtering and aggregates.
///
/// Architecture:
/// ```text
///   exoplanets.csv (cache or download)
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse CSV → Dataset (column kinds inferred)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  columns + immutable rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  numeric range predicates → FilteredView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats   │  top-N, grouped counts, describe, histogram, box plot
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
