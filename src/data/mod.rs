/// Data layer: reference catalog, selection, region boundary, area records.
///
/// Architecture:
/// ```text
///   classes.json / .csv          region .geojson
///        │                            │
///        ▼                            ▼
///   ┌───────────┐               ┌────────────────┐
///   │  catalog   │               │ RegionBoundary │
///   └───────────┘               └────────────────┘
///        │                            │
///        ▼                            ▼
///   ┌───────────┐   remote      ┌────────────────┐
///   │ selection  │──queries────▶│   aggregator    │
///   └───────────┘               └────────────────┘
///                                     │
///                                     ▼
///                               Vec<AreaRecord>
/// ```

pub mod catalog;
pub mod model;
pub mod region;
pub mod selection;
