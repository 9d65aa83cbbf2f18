//! Command implementations and argument parsing for the synthgraph CLI.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use synthgraph_core::{
    AttachmentParams, CheckpointConfig, DEFAULT_RNG_SEED, DistributionSet, ExtractionConfig,
    GenerationError, Graph, GraphStore, KroneckerParams, KroneckerSampling, Metric, ModelKind,
    PageRankConfig, SeedMatrix, StoreError, SynthesizerBuilder, VeracityError,
    VeracityEvaluator, extract,
};
use synthgraph_providers_parquet::ParquetGraphStore;
use synthgraph_providers_text::{EdgeListError, EdgeListReader, TextGraphStore};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_TOLERANCE: f64 = 0.001;
const DEFAULT_RESET_PROBABILITY: f64 = 0.15;
const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "synthgraph",
    about = "Synthesize graphs that resemble a seed graph and score their fidelity."
)]
pub struct Cli {
    /// Persistence backend holding named graphs.
    #[arg(long, value_enum, default_value_t = Backend::Parquet)]
    pub backend: Backend,

    /// Directory of the graph store.
    #[arg(long)]
    pub store: PathBuf,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported persistence backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// One directory per graph holding `vertices.parquet` and `edges.parquet`.
    Parquet,
    /// One tab-separated `<name>.graph` file per graph.
    Text,
}

impl Backend {
    /// Returns the backend's stable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parquet => "parquet",
            Self::Text => "text",
        }
    }
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Store an edge-labelled seed graph read from an edge list.
    Import(ImportArgs),
    /// Print the degree and property distributions of a stored graph.
    Distribution(DistributionArgs),
    /// Grow a seed graph by preferential attachment.
    Attachment(AttachmentArgs),
    /// Expand a seed matrix into a graph by recursive Kronecker products.
    Kronecker(KroneckerArgs),
    /// Score how closely a synthetic graph reproduces a seed graph.
    Veracity(VeracityArgs),
}

impl Command {
    /// Returns the subcommand name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Import(_) => "import",
            Self::Distribution(_) => "distribution",
            Self::Attachment(_) => "attachment",
            Self::Kronecker(_) => "kronecker",
            Self::Veracity(_) => "veracity",
        }
    }
}

/// Arguments of the `import` command.
#[derive(Debug, Args, Clone)]
pub struct ImportArgs {
    /// Edge list with one `source target [label]` line per edge.
    pub path: PathBuf,

    /// Name under which the graph is stored.
    #[arg(long)]
    pub name: String,

    /// Edge property receiving the label column.
    #[arg(long, default_value = "label")]
    pub label_key: String,

    /// Replace a stored graph with the same name.
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments of the `distribution` command.
#[derive(Debug, Args, Clone)]
pub struct DistributionArgs {
    /// Stored graph to summarise.
    pub seed: String,

    /// Also extract per-property histograms.
    #[arg(long)]
    pub properties: bool,
}

/// Options shared by both generation models.
#[derive(Debug, Args, Clone)]
pub struct GenerationArgs {
    /// Name under which the synthetic graph is stored.
    #[arg(long)]
    pub output: String,

    /// Work partitions per round; defaults to the rayon thread count.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub partitions: Option<usize>,

    /// Base seed of every random stream.
    #[arg(long, default_value_t = DEFAULT_RNG_SEED)]
    pub rng_seed: u64,

    /// Sample vertex and edge properties from the seed's histograms.
    #[arg(long)]
    pub properties: bool,

    /// Replace a stored graph with the same name.
    #[arg(long)]
    pub overwrite: bool,
}

impl GenerationArgs {
    fn builder(&self) -> SynthesizerBuilder {
        SynthesizerBuilder::new()
            .with_partitions(self.partitions.unwrap_or_else(rayon::current_num_threads))
            .with_rng_seed(self.rng_seed)
            .with_generate_properties(self.properties)
    }
}

/// Arguments of the `attachment` command.
#[derive(Debug, Args, Clone)]
pub struct AttachmentArgs {
    /// Stored seed graph to grow.
    pub seed: String,

    /// Number of growth rounds.
    #[arg(long)]
    pub iterations: usize,

    /// Vertices added per round.
    #[arg(long)]
    pub nodes_per_iteration: usize,

    /// Edges per new vertex; defaults to the seed's mean out-degree.
    #[arg(long)]
    pub edges_per_vertex: Option<usize>,

    /// Save a checkpoint of the growing graph every `n` rounds.
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "1")]
    pub checkpoint_every: Option<usize>,

    /// Resume from the stored checkpoint when one exists.
    #[arg(long, requires = "checkpoint_every")]
    pub resume: bool,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// Arguments of the `kronecker` command.
#[derive(Debug, Args, Clone)]
pub struct KroneckerArgs {
    /// Seed matrix file with one whitespace-separated row per line.
    pub matrix: PathBuf,

    /// Expansion depth; the graph spans `k^depth` vertex ids.
    #[arg(long)]
    pub depth: u32,

    /// Candidate edge sampling strategy.
    #[arg(long, value_enum, default_value_t = SamplingArg::Exhaustive)]
    pub sampling: SamplingArg,

    /// Stored graph whose property histograms feed `--properties`.
    #[arg(long)]
    pub seed: Option<String>,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// Kronecker sampling strategies exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SamplingArg {
    /// One Bernoulli trial per candidate edge.
    Exhaustive,
    /// A fixed number of independent edge placements.
    EdgePlacement,
}

impl From<SamplingArg> for KroneckerSampling {
    fn from(value: SamplingArg) -> Self {
        match value {
            SamplingArg::Exhaustive => Self::Exhaustive,
            SamplingArg::EdgePlacement => Self::EdgePlacement,
        }
    }
}

/// Arguments of the `veracity` command.
#[derive(Debug, Args, Clone)]
pub struct VeracityArgs {
    /// Stored seed graph.
    pub seed: String,

    /// Stored synthetic graph.
    pub synthetic: String,

    /// One of `degree`, `inDegree`, `outDegree` or `pageRank`.
    #[arg(long, default_value = "degree")]
    pub metric: String,

    /// Write `<metric>_seed.csv` and `<metric>_synthetic.csv` here.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Replace existing distribution files.
    #[arg(long)]
    pub overwrite: bool,

    /// PageRank convergence tolerance.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// PageRank random-reset probability.
    #[arg(long, default_value_t = DEFAULT_RESET_PROBABILITY)]
    pub reset_probability: f64,

    /// PageRank iteration cap.
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,
}

/// Errors surfaced while executing CLI commands, grouped by phase.
#[derive(Debug, Error)]
pub enum CliError {
    /// The seed edge list could not be ingested.
    #[error("extraction failed: {0}")]
    Extraction(#[from] EdgeListError),
    /// Graph synthesis failed or was misconfigured.
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// Veracity evaluation failed or was misconfigured.
    #[error("evaluation failed: {0}")]
    Evaluation(#[from] VeracityError),
    /// Loading or saving a named graph failed.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
    /// Writing the summary failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Returns the phase that failed.
    #[must_use]
    pub const fn phase(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "extraction",
            Self::Generation(_) => "generation",
            Self::Evaluation(_) => "evaluation",
            Self::Persistence(_) => "persistence",
            Self::Io(_) => "io",
        }
    }

    /// Returns the stable code of the underlying failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Extraction(EdgeListError::MissingTarget { .. }) => "EDGE_LIST_MISSING_TARGET",
            Self::Extraction(EdgeListError::InvalidId { .. }) => "EDGE_LIST_INVALID_ID",
            Self::Extraction(EdgeListError::Graph(error)) => error.code().as_str(),
            Self::Extraction(EdgeListError::Io(_)) => "EDGE_LIST_IO",
            Self::Generation(error) => error.code().as_str(),
            Self::Evaluation(error) => error.code().as_str(),
            Self::Persistence(error) => error.code().as_str(),
            Self::Io(_) => "CLI_IO",
        }
    }

    /// Returns the persistence code behind a failed checkpoint.
    #[must_use]
    pub const fn store_code(&self) -> Option<&'static str> {
        match self {
            Self::Generation(error) => match error.store_code() {
                Some(code) => Some(code.as_str()),
                None => None,
            },
            _ => None,
        }
    }
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// An edge list was stored as a graph.
    Imported {
        /// Stored graph name.
        name: String,
        /// Vertices in the stored graph.
        vertices: usize,
        /// Edges in the stored graph.
        edges: usize,
    },
    /// Distributions were extracted from a stored graph.
    Distribution {
        /// Graph the distributions describe.
        seed: String,
        /// Extracted histograms.
        distributions: DistributionSet,
    },
    /// A synthetic graph was generated and stored.
    Synthesized {
        /// Generation model used.
        model: ModelKind,
        /// Stored graph name.
        name: String,
        /// Vertices in the synthetic graph.
        vertices: usize,
        /// Edges in the synthetic graph.
        edges: usize,
    },
    /// A metric was scored.
    Veracity {
        /// Evaluated metric.
        metric: Metric,
        /// KS statistic in `[0, 1]`; lower is better.
        score: f64,
        /// Directory holding the written distributions, when requested.
        output_dir: Option<PathBuf>,
    },
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] naming the phase that failed.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use synthgraph_cli::cli::{Backend, Cli, Command, ExecutionSummary, ImportArgs, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let edges = dir.path().join("seed.edges");
/// std::fs::write(&edges, "0 1 scan\n1 2\n")?;
/// let cli = Cli {
///     backend: Backend::Text,
///     store: dir.path().join("store"),
///     command: Command::Import(ImportArgs {
///         path: edges,
///         name: "seed".into(),
///         label_key: "label".into(),
///         overwrite: false,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert!(matches!(summary, ExecutionSummary::Imported { vertices: 3, edges: 2, .. }));
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = cli.command.as_str(), backend = cli.backend.as_str()),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let store = open_store(cli.backend, cli.store);
    let summary = match cli.command {
        Command::Import(args) => run_import(store.as_ref(), args)?,
        Command::Distribution(args) => run_distribution(store.as_ref(), args)?,
        Command::Attachment(args) => run_attachment(&store, args)?,
        Command::Kronecker(args) => run_kronecker(store.as_ref(), args)?,
        Command::Veracity(args) => run_veracity(store.as_ref(), args)?,
    };
    info!("command completed");
    Ok(summary)
}

pub(super) fn open_store(backend: Backend, root: PathBuf) -> Arc<dyn GraphStore> {
    match backend {
        Backend::Parquet => Arc::new(ParquetGraphStore::new(root)),
        Backend::Text => Arc::new(TextGraphStore::new(root)),
    }
}

#[instrument(
    name = "cli.import",
    err,
    skip(store, args),
    fields(path = %args.path.display(), name = %args.name),
)]
pub(super) fn run_import(
    store: &dyn GraphStore,
    args: ImportArgs,
) -> Result<ExecutionSummary, CliError> {
    let ImportArgs {
        path,
        name,
        label_key,
        overwrite,
    } = args;
    let graph = EdgeListReader::new()
        .with_label_key(&label_key)
        .read_path(&path)?;
    store.save_graph(&graph, &name, overwrite)?;
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "seed imported"
    );
    Ok(ExecutionSummary::Imported {
        name,
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
    })
}

#[instrument(name = "cli.distribution", err, skip(store, args), fields(seed = %args.seed))]
pub(super) fn run_distribution(
    store: &dyn GraphStore,
    args: DistributionArgs,
) -> Result<ExecutionSummary, CliError> {
    let graph = store.load_graph(&args.seed)?;
    let distributions = extract(
        &graph,
        ExtractionConfig::new().with_properties(args.properties),
    );
    Ok(ExecutionSummary::Distribution {
        seed: args.seed,
        distributions,
    })
}

#[instrument(
    name = "cli.attachment",
    err,
    skip(store, args),
    fields(seed = %args.seed, output = %args.generation.output, checkpoint = field::Empty),
)]
pub(super) fn run_attachment(
    store: &Arc<dyn GraphStore>,
    args: AttachmentArgs,
) -> Result<ExecutionSummary, CliError> {
    let mut params = AttachmentParams::new(args.iterations, args.nodes_per_iteration);
    if let Some(edges) = args.edges_per_vertex {
        params = params.with_edges_per_vertex(edges);
    }
    let mut builder = args.generation.builder().with_model(params);
    if let Some(interval) = args.checkpoint_every {
        let name = checkpoint_name(&args.generation.output);
        Span::current().record("checkpoint", field::display(&name));
        builder = builder.with_checkpoint(
            CheckpointConfig::new(Arc::clone(store), name)
                .with_interval(interval)
                .with_resume(args.resume),
        );
    }
    let synthesizer = builder.build()?;
    ensure_free(store.as_ref(), &args.generation)?;

    let seed = store.load_graph(&args.seed)?;
    let graph = synthesizer.synthesize_from_seed(&seed)?;
    save_synthetic(store.as_ref(), ModelKind::Attachment, &graph, &args.generation)
}

#[instrument(
    name = "cli.kronecker",
    err,
    skip(store, args),
    fields(matrix = %args.matrix.display(), depth = args.depth, output = %args.generation.output),
)]
pub(super) fn run_kronecker(
    store: &dyn GraphStore,
    args: KroneckerArgs,
) -> Result<ExecutionSummary, CliError> {
    let matrix = SeedMatrix::from_path(&args.matrix).map_err(GenerationError::from)?;
    let params = KroneckerParams::new(matrix, args.depth).with_sampling(args.sampling.into());
    let synthesizer = args.generation.builder().with_model(params).build()?;
    ensure_free(store, &args.generation)?;

    let seed = match &args.seed {
        Some(name) => store.load_graph(name)?,
        None => Graph::empty(),
    };
    let graph = synthesizer.synthesize_from_seed(&seed)?;
    save_synthetic(store, ModelKind::Kronecker, &graph, &args.generation)
}

#[instrument(
    name = "cli.veracity",
    err,
    skip(store, args),
    fields(seed = %args.seed, synthetic = %args.synthetic, metric = %args.metric),
)]
pub(super) fn run_veracity(
    store: &dyn GraphStore,
    args: VeracityArgs,
) -> Result<ExecutionSummary, CliError> {
    let metric: Metric = args.metric.parse()?;
    let pagerank = PageRankConfig::new(args.tolerance, args.reset_probability, args.max_iterations)?;
    let mut evaluator = VeracityEvaluator::new().with_pagerank(pagerank);
    if let Some(dir) = &args.output_dir {
        evaluator = evaluator.with_output_dir(dir.clone());
    }

    let seed = store.load_graph(&args.seed)?;
    let synthetic = store.load_graph(&args.synthetic)?;
    let result = evaluator.evaluate(
        metric,
        &seed,
        &synthetic,
        args.output_dir.is_some(),
        args.overwrite,
    )?;
    Ok(ExecutionSummary::Veracity {
        metric,
        score: result.score(),
        output_dir: args.output_dir,
    })
}

/// Rejects a taken output name before any generation work.
fn ensure_free(store: &dyn GraphStore, args: &GenerationArgs) -> Result<(), CliError> {
    if !args.overwrite && store.contains(&args.output)? {
        return Err(StoreError::AlreadyExists {
            store: Arc::from(store.name()),
            name: Arc::from(args.output.as_str()),
        }
        .into());
    }
    Ok(())
}

fn save_synthetic(
    store: &dyn GraphStore,
    model: ModelKind,
    graph: &Graph,
    args: &GenerationArgs,
) -> Result<ExecutionSummary, CliError> {
    store.save_graph(graph, &args.output, args.overwrite)?;
    info!(
        name = args.output.as_str(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "synthetic graph saved"
    );
    Ok(ExecutionSummary::Synthesized {
        model,
        name: args.output.clone(),
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
    })
}

pub(super) fn checkpoint_name(output: &str) -> String {
    format!("{output}-checkpoint")
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use synthgraph_cli::cli::{ExecutionSummary, render_summary};
/// # use synthgraph_core::Metric;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary::Veracity {
///     metric: Metric::InDegree,
///     score: 0.25,
///     output_dir: None,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "metric: inDegree\nscore: 0.25\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Imported {
            name,
            vertices,
            edges,
        } => {
            writeln!(writer, "graph: {name}")?;
            writeln!(writer, "vertices: {vertices}")?;
            writeln!(writer, "edges: {edges}")?;
        }
        ExecutionSummary::Distribution {
            seed,
            distributions,
        } => render_distributions(seed, distributions, &mut writer)?,
        ExecutionSummary::Synthesized {
            model,
            name,
            vertices,
            edges,
        } => {
            writeln!(writer, "model: {model}")?;
            writeln!(writer, "graph: {name}")?;
            writeln!(writer, "vertices: {vertices}")?;
            writeln!(writer, "edges: {edges}")?;
        }
        ExecutionSummary::Veracity {
            metric,
            score,
            output_dir,
        } => {
            writeln!(writer, "metric: {metric}")?;
            writeln!(writer, "score: {score}")?;
            if let Some(dir) = output_dir {
                writeln!(writer, "distributions: {}", dir.display())?;
            }
        }
    }
    Ok(())
}

fn render_distributions(
    seed: &str,
    distributions: &DistributionSet,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer, "graph: {seed}")?;
    writeln!(writer, "vertices: {}", distributions.vertex_count())?;
    writeln!(writer, "edges: {}", distributions.edge_count())?;
    writeln!(writer, "degree\tvertices")?;
    for (degree, count) in distributions.degree().iter() {
        writeln!(writer, "{degree}\t{count}")?;
    }
    for (scope, histograms) in [
        ("vertex", distributions.vertex_properties()),
        ("edge", distributions.edge_properties()),
    ] {
        for (key, histogram) in histograms {
            writeln!(writer, "{scope} property {key}\tcount")?;
            for (value, count) in histogram.iter() {
                writeln!(writer, "{value}\t{count}")?;
            }
        }
    }
    Ok(())
}
