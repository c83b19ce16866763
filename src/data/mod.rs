/// Data layer: core types, loading, cleaning, charting and export.
///
/// Architecture:
/// ```text
///  .csv / .xlsx bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  detect format, parse → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  dedup → mean-fill → column projection
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  chart    │   │  export   │  CSV text / XLSX workbook bytes
///   └──────────┘   └──────────┘
/// ```

pub mod chart;
pub mod clean;
pub mod export;
pub mod loader;
pub mod model;
