//! Flat-file graph persistence and edge-list ingestion.
//!
//! [`TextGraphStore`] keeps one `<name>.graph` file per graph.
//! [`EdgeListReader`] turns a whitespace-separated `source target [label]`
//! edge list into a seed graph.

mod edge_list;
mod errors;
mod store;

pub use edge_list::EdgeListReader;
pub use errors::{EdgeListError, TextStoreError};
pub use store::TextGraphStore;
