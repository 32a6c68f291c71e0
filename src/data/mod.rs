/// Data layer: core types, loading, filtering and summary statistics.
///
/// Architecture:
/// ```text
///  ;-delimited text (unknown encoding)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  try encodings in order → Table (+ Decoding used)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  per-column selections (All / subset) → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  coerce cells → NumericColumnStat per numeric column
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
