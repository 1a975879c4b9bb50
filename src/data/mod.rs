/// Data layer: point model, normalization, loading, filtering and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → header-keyed raw rows
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  raw row → Point (or drop the row)
///   └───────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ PointStore  │  Vec<Point>, immutable after load
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category / severity / search → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  filtered subset → GeoJSON FeatureCollection
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
