/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SalaryTable (cached per path)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ SalaryTable  │  Vec<Record>, distinct values per dimension
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply dimension selections → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  means, mode, top-N, histogram, value counts
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
