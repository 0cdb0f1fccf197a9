/// Data layer: core types, loading, filtering and the region cascade.
///
/// Architecture:
/// ```text
///  happiness_fixed.csv  (semicolon-delimited)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Vec<Row>, distinct years / regions / countries
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  filter   │   │ cascade  │  regions → countries
///   └──────────┘   └──────────┘
///   year/region/country + 14 bounds → row indices
/// ```

pub mod cascade;
pub mod filter;
pub mod iso;
pub mod loader;
pub mod model;
