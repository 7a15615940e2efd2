//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → CityTable (cached per path)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │  CityTable    │  Vec<CityRecord>, state / city option lists
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterCriteria → matching rows, ranked by affordability
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
