/// Data layer: typed relations, CSV loading, and the view pipeline.
///
/// Architecture:
/// ```text
///  csv_data/*.csv  pref_lat_lon.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode (Shift_JIS / UTF-8) → typed rows
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ WageDataset │  four relations + derived indices
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  views    │  filter / join / normalize → chart-ready tables
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod views;
