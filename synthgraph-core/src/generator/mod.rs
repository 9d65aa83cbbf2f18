//! Generative models that grow or expand a synthetic graph from a seed.
//!
//! Both models implement [`GraphGenerator`]; [`crate::SynthesizerBuilder`]
//! validates the parameters and picks the implementation.

pub(crate) mod attachment;
pub(crate) mod kronecker;
mod properties;
pub(crate) mod rng;

use std::{
    fmt,
    num::NonZeroUsize,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{Result, distribution::DistributionSet, graph::Graph, store::GraphStore};

pub use self::{
    attachment::{AttachmentGrower, AttachmentParams},
    kronecker::{KroneckerExpander, KroneckerParams, KroneckerSampling, SeedMatrix},
};
pub(crate) use self::properties::PropertySampler;

/// RNG seed used when the caller does not supply one.
pub const DEFAULT_RNG_SEED: u64 = 0x5EED_CAFE;

/// Strategy contract shared by the generative models.
///
/// Parameters are fixed at construction; `synthesize` never mutates the seed
/// graph or the distributions.
pub trait GraphGenerator: Send + Sync + fmt::Debug {
    /// Returns which model this generator implements.
    fn model(&self) -> ModelKind;

    /// Produces a synthetic graph.
    ///
    /// When `generate_properties` is set, every new vertex and edge receives
    /// values sampled independently from the seed's property distributions.
    ///
    /// # Errors
    /// Returns a [`crate::GenerationError`] when checkpointing fails, the run
    /// is cancelled, or the produced graph violates the graph invariants.
    fn synthesize(
        &self,
        seed: &Graph,
        distributions: &DistributionSet,
        generate_properties: bool,
    ) -> Result<Graph>;
}

/// Identifies a generative model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Barabási–Albert preferential attachment.
    Attachment,
    /// Recursive stochastic Kronecker expansion.
    Kronecker,
}

impl ModelKind {
    /// Returns the model's stable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Kronecker => "kronecker",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model selection plus model-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationModel {
    /// Grow the seed by preferential attachment.
    Attachment(AttachmentParams),
    /// Expand a seed matrix by recursive Kronecker products.
    Kronecker(KroneckerParams),
}

impl GenerationModel {
    /// Returns the selected model.
    #[must_use]
    pub const fn kind(&self) -> ModelKind {
        match self {
            Self::Attachment(_) => ModelKind::Attachment,
            Self::Kronecker(_) => ModelKind::Kronecker,
        }
    }
}

impl From<AttachmentParams> for GenerationModel {
    fn from(params: AttachmentParams) -> Self {
        Self::Attachment(params)
    }
}

impl From<KroneckerParams> for GenerationModel {
    fn from(params: KroneckerParams) -> Self {
        Self::Kronecker(params)
    }
}

/// Cooperative cancellation flag shared between a run and its caller.
///
/// The attachment grower polls it at every round boundary and the Kronecker
/// expander before assembling the final graph.
///
/// # Examples
/// ```
/// use synthgraph_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Tokens are equal when they share one cancellation flag.
impl PartialEq for CancellationToken {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for CancellationToken {}

/// Where and how often the attachment grower persists intermediate graphs.
#[derive(Clone)]
pub struct CheckpointConfig {
    store: Arc<dyn GraphStore>,
    name: Arc<str>,
    interval: usize,
    resume: bool,
}

impl CheckpointConfig {
    /// Checkpoints into `store` under `name` after every round, without
    /// resuming.
    #[must_use]
    pub fn new(store: Arc<dyn GraphStore>, name: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            name: name.into(),
            interval: 1,
            resume: false,
        }
    }

    /// Saves after every `interval` completed rounds.
    #[must_use]
    pub fn with_interval(mut self, interval: usize) -> Self {
        self.interval = interval;
        self
    }

    /// Loads an existing checkpoint before the first round when set.
    #[must_use]
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Returns the backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    #[rustfmt::skip]
    #[must_use]
    pub fn interval(&self) -> usize { self.interval }

    #[rustfmt::skip]
    #[must_use]
    pub fn resume(&self) -> bool { self.resume }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }
}

impl fmt::Debug for CheckpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckpointConfig")
            .field("store", &self.store.name())
            .field("name", &self.name)
            .field("interval", &self.interval)
            .field("resume", &self.resume)
            .finish()
    }
}

impl PartialEq for CheckpointConfig {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
            && self.name == other.name
            && self.interval == other.interval
            && self.resume == other.resume
    }
}

/// Model-independent run parameters, validated by
/// [`crate::SynthesizerBuilder::build`].
#[derive(Debug, Clone)]
pub struct GenerationParams {
    partitions: NonZeroUsize,
    rng_seed: u64,
    checkpoint: Option<CheckpointConfig>,
    cancellation: Option<CancellationToken>,
}

impl GenerationParams {
    pub(crate) fn new(
        partitions: NonZeroUsize,
        rng_seed: u64,
        checkpoint: Option<CheckpointConfig>,
        cancellation: Option<CancellationToken>,
    ) -> Self {
        Self {
            partitions,
            rng_seed,
            checkpoint,
            cancellation,
        }
    }

    /// Returns how many chunks per-round work is split into.
    #[rustfmt::skip]
    #[must_use]
    pub fn partitions(&self) -> NonZeroUsize { self.partitions }

    /// Returns the base seed every RNG stream derives from.
    #[rustfmt::skip]
    #[must_use]
    pub fn rng_seed(&self) -> u64 { self.rng_seed }

    /// Returns the checkpoint configuration, if any.
    #[must_use]
    pub fn checkpoint(&self) -> Option<&CheckpointConfig> {
        self.checkpoint.as_ref()
    }

    /// Returns whether the caller cancelled the run.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Minimum rayon chunk length that splits `len` items into at most
    /// `partitions` chunks.
    pub(crate) fn chunk_len(&self, len: usize) -> usize {
        len.div_ceil(self.partitions.get()).max(1)
    }
}
