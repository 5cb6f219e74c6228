/// Data layer: core types, loading, filtering and saving.
///
/// Architecture:
/// ```text
///   orders.xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  first sheet → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  RuleSet → (kept, removed)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  orders_CLEANED.xlsx [+ orders_DELETED.xlsx]
///   └──────────┘
/// ```

pub mod column;
pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;
