//! Support library for the synthgraph CLI binary.
//!
//! Exposes the command pipeline and logging setup so doctests and tests can
//! drive commands without forking a subprocess.

pub mod cli;
pub mod logging;
