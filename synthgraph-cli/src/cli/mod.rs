//! Command-line interface orchestration for synthgraph.
//!
//! Every command works against a named-graph store (`--backend`, `--store`):
//! `import` ingests an edge list, `distribution` summarises a stored graph,
//! `attachment` and `kronecker` synthesize and store a new graph, and
//! `veracity` scores a synthetic graph against its seed.

mod commands;

pub use commands::{
    AttachmentArgs, Backend, Cli, CliError, Command, DistributionArgs, ExecutionSummary,
    GenerationArgs, ImportArgs, KroneckerArgs, SamplingArg, VeracityArgs, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
