//! Parquet-backed graph persistence.
//!
//! Each graph lives in its own directory holding `vertices.parquet`
//! (`id: UInt64`, `properties: Utf8`) and `edges.parquet` (`source: UInt64`,
//! `target: UInt64`, `properties: Utf8`). Property payloads use the core's
//! single-line codec.

mod columns;
mod errors;
mod store;

pub use errors::ParquetStoreError;
pub use store::ParquetGraphStore;

#[cfg(test)]
mod tests;
