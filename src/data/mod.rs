/// Data layer: core types, loading, enrichment, filtering and export.
///
/// Architecture:
/// ```text
///  .csv / .parquet  (historical + recent)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  enrich   │  derive floor / lease / year buckets → ResaleDataset
///   └──────────┘
///        │            (memoized by cache)
///        ▼
///   ┌──────────┐
///   │  filter   │  apply dimension predicates → filtered indices
///   └──────────┘
///        │
///        ▼
///   aggregate / export
/// ```

pub mod aggregate;
pub mod cache;
pub mod enrich;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;

pub use error::{DataError, Result};
