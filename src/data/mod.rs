/// Data layer: DTASelect-filter records, parsing, writing, subsetting and
/// flattened tables.
///
/// Architecture:
/// ```text
///  DTASelect-filter.txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → FilterFile
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ FilterFile  │  version, header, Vec<ResultGroup>, footer
///   └────────────┘
///        │                         │
///        ▼                         ▼
///   ┌──────────┐             ┌──────────┐
///   │  table    │ rows+keys   │  filter   │ keep records by key → FilterFile
///   └──────────┘             └──────────┘
///        │                         │
///        ▼                         ▼
///   ┌──────────┐             ┌──────────┐
///   │  export   │ csv/json/pq │  writer   │ FilterFile → text
///   └──────────┘             └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod table;
pub mod writer;

#[cfg(test)]
pub(crate) mod testdata;
