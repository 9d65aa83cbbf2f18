//! Benchmark support crate for synthgraph.
//!
//! Provides seeded synthetic seed graphs, seed matrices and parameter types
//! used by the Criterion benchmarks for graph generation and veracity
//! evaluation.

pub mod error;
pub mod params;
pub mod source;
