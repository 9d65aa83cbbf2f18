//! Unit tests for the Parquet store.

mod columns;
mod store;
mod support;
