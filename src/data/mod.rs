/// Data layer: record table, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  EMA_2021_2022.csv (.parquet / .json)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RecordTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  once-initialized Arc<RecordTable>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  conjunction of field == value → row indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  counts, top-k, cross-tab → Report
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
