/// Data layer: core types, loading, filtering, grouping and statistics.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv        sample
///        │                          │
///        ▼                          │
///   ┌──────────┐                    │
///   │  loader   │  parse file ──────┤
///   └──────────┘                    ▼
///                            ┌──────────┐
///                            │ Dataset   │  Vec<Record>, schema, unique values
///                            └──────────┘
///                                  │
///                                  ▼
///                            ┌──────────┐
///                            │  filter   │  AND of predicates → new Dataset
///                            └──────────┘
///                              │      │
///                              ▼      ▼
///                       ┌───────┐  ┌───────┐
///                       │ group  │  │ stats  │
///                       └───────┘  └───────┘
/// ```

pub mod error;
pub mod filter;
pub mod group;
pub mod loader;
pub mod model;
pub mod sample;
pub mod stats;
