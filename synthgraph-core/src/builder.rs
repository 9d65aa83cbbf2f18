//! Builder utilities for configuring graph synthesis.
//!
//! Exposes the model selection surface and the validation performed before
//! constructing [`Synthesizer`] instances.

use std::{num::NonZeroUsize, sync::Arc};

use crate::{
    Result,
    error::GenerationError,
    generator::{
        AttachmentGrower, CancellationToken, CheckpointConfig, DEFAULT_RNG_SEED, GenerationModel,
        GenerationParams, GraphGenerator, KroneckerExpander,
    },
    store::validate_graph_name,
    synthesizer::Synthesizer,
};

/// Configures and constructs [`Synthesizer`] instances.
///
/// Every parameter is validated in [`Self::build`], before any generation
/// work starts.
///
/// # Examples
/// ```
/// use synthgraph_core::{AttachmentParams, ModelKind, SynthesizerBuilder};
///
/// let synthesizer = SynthesizerBuilder::new()
///     .with_model(AttachmentParams::new(2, 5))
///     .with_partitions(4)
///     .with_rng_seed(7)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(synthesizer.model(), ModelKind::Attachment);
/// assert_eq!(synthesizer.params().partitions().get(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct SynthesizerBuilder {
    model: Option<GenerationModel>,
    partitions: usize,
    rng_seed: u64,
    checkpoint: Option<CheckpointConfig>,
    cancellation: Option<CancellationToken>,
    generate_properties: bool,
}

impl Default for SynthesizerBuilder {
    fn default() -> Self {
        Self {
            model: None,
            partitions: rayon::current_num_threads(),
            rng_seed: DEFAULT_RNG_SEED,
            checkpoint: None,
            cancellation: None,
            generate_properties: false,
        }
    }
}

impl SynthesizerBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use synthgraph_core::{DEFAULT_RNG_SEED, SynthesizerBuilder};
    ///
    /// let builder = SynthesizerBuilder::new();
    /// assert_eq!(builder.rng_seed(), DEFAULT_RNG_SEED);
    /// assert!(builder.partitions() > 0);
    /// assert!(!builder.generate_properties());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the generative model and its parameters.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<GenerationModel>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Returns the selected model, if any.
    #[must_use]
    pub fn model(&self) -> Option<&GenerationModel> {
        self.model.as_ref()
    }

    /// Sets how many chunks per-round work is split into.
    #[must_use]
    pub fn with_partitions(mut self, partitions: usize) -> Self {
        self.partitions = partitions;
        self
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn partitions(&self) -> usize { self.partitions }

    /// Sets the base RNG seed.
    #[must_use]
    pub fn with_rng_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn rng_seed(&self) -> u64 { self.rng_seed }

    /// Enables checkpointing. Only the attachment model supports it.
    #[must_use]
    pub fn with_checkpoint(mut self, checkpoint: CheckpointConfig) -> Self {
        self.checkpoint = Some(checkpoint);
        self
    }

    /// Installs a cancellation token the run polls.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Samples vertex and edge properties for generated elements when set.
    #[must_use]
    pub fn with_generate_properties(mut self, generate_properties: bool) -> Self {
        self.generate_properties = generate_properties;
        self
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn generate_properties(&self) -> bool { self.generate_properties }

    /// Validates the configuration and constructs a [`Synthesizer`].
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameter`] when no model is selected,
    /// a count is zero, or a checkpoint is configured for the Kronecker
    /// model; [`GenerationError::VertexSpaceOverflow`] when `k^depth` is not
    /// addressable; and [`GenerationError::Checkpoint`] for an invalid
    /// checkpoint name.
    ///
    /// # Examples
    /// ```
    /// use synthgraph_core::{AttachmentParams, SynthesizerBuilder};
    ///
    /// let err = SynthesizerBuilder::new()
    ///     .with_model(AttachmentParams::new(0, 5))
    ///     .build()
    ///     .expect_err("zero iterations are rejected");
    /// assert_eq!(err.code().as_str(), "GENERATION_INVALID_PARAMETER");
    /// ```
    pub fn build(self) -> Result<Synthesizer> {
        let model = self
            .model
            .ok_or_else(|| GenerationError::invalid("model", "no generation model selected"))?;
        let partitions = NonZeroUsize::new(self.partitions)
            .ok_or_else(|| GenerationError::invalid("partitions", "must be positive"))?;
        if let Some(checkpoint) = &self.checkpoint {
            validate_checkpoint(checkpoint)?;
        }

        let (generator, generation): (Arc<dyn GraphGenerator>, GenerationParams) = match model {
            GenerationModel::Attachment(params) => {
                params.validate()?;
                let generation =
                    GenerationParams::new(partitions, self.rng_seed, self.checkpoint, self.cancellation);
                (Arc::new(AttachmentGrower::new(params, generation.clone())), generation)
            }
            GenerationModel::Kronecker(params) => {
                params.validate()?;
                if self.checkpoint.is_some() {
                    return Err(GenerationError::invalid(
                        "checkpoint",
                        "checkpointing is only supported by the attachment model",
                    ));
                }
                let generation = GenerationParams::new(partitions, self.rng_seed, None, self.cancellation);
                (Arc::new(KroneckerExpander::new(params, generation.clone())), generation)
            }
        };
        Ok(Synthesizer::new(generator, generation, self.generate_properties))
    }
}

fn validate_checkpoint(checkpoint: &CheckpointConfig) -> Result<()> {
    if checkpoint.interval() == 0 {
        return Err(GenerationError::invalid(
            "checkpoint_interval",
            "must be positive",
        ));
    }
    validate_graph_name(checkpoint.name()).map_err(|error| GenerationError::Checkpoint {
        name: checkpoint.shared_name(),
        error,
    })
}
