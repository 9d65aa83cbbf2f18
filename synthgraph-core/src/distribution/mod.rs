//! Empirical distributions extracted from seed graphs.
//!
//! [`Histogram`]s are built by mapping records to values and merging partial
//! counts; the merge is associative and commutative so partitions may combine
//! in any order. A [`Distribution`] is the read-only sampling view shared by
//! generator workers.

mod extract;

use std::{collections::BTreeMap, sync::Arc};

use rand::Rng;

use crate::graph::PropertyValue;

pub use self::extract::{ExtractionConfig, extract};

/// Count of observations per exact value.
///
/// # Examples
/// ```
/// use synthgraph_core::Histogram;
///
/// let left: Histogram<u64> = [1, 1, 2].into_iter().collect();
/// let right: Histogram<u64> = [2, 5].into_iter().collect();
/// let merged = left.merge(right);
/// assert_eq!(merged.count(&1), 2);
/// assert_eq!(merged.count(&2), 2);
/// assert_eq!(merged.total(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram<K: Ord> {
    counts: BTreeMap<K, u64>,
    total: u64,
}

impl<K: Ord> Default for Histogram<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }
}

impl<K: Ord> Histogram<K> {
    /// Creates an empty histogram.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the histogram with one more observation of `value`.
    #[must_use]
    pub fn with(self, value: K) -> Self {
        self.with_count(value, 1)
    }

    /// Returns the histogram with `count` more observations of `value`.
    #[must_use]
    pub fn with_count(mut self, value: K, count: u64) -> Self {
        if count > 0 {
            *self.counts.entry(value).or_insert(0) += count;
            self.total += count;
        }
        self
    }

    /// Combines two histograms.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let (mut larger, smaller) = if self.counts.len() >= other.counts.len() {
            (self, other)
        } else {
            (other, self)
        };
        for (value, count) in smaller.counts {
            *larger.counts.entry(value).or_insert(0) += count;
        }
        larger.total += smaller.total;
        larger
    }

    /// Returns how often `value` was observed.
    #[must_use]
    pub fn count(&self, value: &K) -> u64 {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Returns the total number of observations.
    #[rustfmt::skip]
    #[must_use]
    pub fn total(&self) -> u64 { self.total }

    /// Returns the number of distinct values.
    #[rustfmt::skip]
    #[must_use]
    pub fn len(&self) -> usize { self.counts.len() }

    /// Returns whether nothing was observed.
    #[rustfmt::skip]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.counts.is_empty() }

    /// Iterates over `(value, count)` pairs in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.counts.iter().map(|(value, count)| (value, *count))
    }
}

impl<K: Ord> FromIterator<K> for Histogram<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

/// Sampling view over a non-empty [`Histogram`].
///
/// Each value is drawn with probability `count / total`; the probability
/// masses sum to 1.0.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use synthgraph_core::{Distribution, Histogram};
///
/// let histogram: Histogram<u64> = [3, 3, 3, 7].into_iter().collect();
/// let distribution = Distribution::from_histogram(&histogram).expect("non-empty");
/// assert_eq!(distribution.probability(&3), 0.75);
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let draw = *distribution.sample(&mut rng);
/// assert!(draw == 3 || draw == 7);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution<K> {
    values: Vec<K>,
    cumulative: Vec<u64>,
    total: u64,
}

impl<K: Ord + Clone> Distribution<K> {
    /// Builds the sampling view, or `None` when the histogram is empty.
    #[must_use]
    pub fn from_histogram(histogram: &Histogram<K>) -> Option<Self> {
        if histogram.is_empty() {
            return None;
        }
        let mut running = 0_u64;
        let (values, cumulative) = histogram
            .iter()
            .map(|(value, count)| {
                running += count;
                (value.clone(), running)
            })
            .unzip();
        Some(Self {
            values,
            cumulative,
            total: running,
        })
    }

    /// Returns the probability mass of `value`.
    #[expect(clippy::cast_precision_loss, reason = "counts become probabilities")]
    #[must_use]
    pub fn probability(&self, value: &K) -> f64 {
        let Ok(index) = self.values.binary_search(value) else {
            return 0.0;
        };
        let upper = self.cumulative.get(index).copied().unwrap_or(0);
        let lower = index
            .checked_sub(1)
            .and_then(|previous| self.cumulative.get(previous).copied())
            .unwrap_or(0);
        (upper - lower) as f64 / self.total as f64
    }

    /// Iterates over `(value, probability)` pairs in ascending value order.
    pub fn masses(&self) -> impl Iterator<Item = (&K, f64)> {
        self.values
            .iter()
            .map(move |value| (value, self.probability(value)))
    }

    /// Draws one value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &K {
        let draw = rng.gen_range(0..self.total);
        let index = self.cumulative.partition_point(|&bound| bound <= draw);
        // `draw < total == last cumulative bound`, so `index` is in range.
        &self.values[index]
    }
}

/// Distributions extracted from one seed graph.
///
/// Built once per run and shared read-only by every generator worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributionSet {
    pub(crate) degree: Histogram<u64>,
    pub(crate) vertex_properties: BTreeMap<Arc<str>, Histogram<PropertyValue>>,
    pub(crate) edge_properties: BTreeMap<Arc<str>, Histogram<PropertyValue>>,
    pub(crate) vertex_count: usize,
    pub(crate) edge_count: usize,
}

impl DistributionSet {
    /// Returns the number of vertices per exact total degree.
    #[rustfmt::skip]
    #[must_use]
    pub fn degree(&self) -> &Histogram<u64> { &self.degree }

    /// Returns one histogram per vertex property key.
    #[rustfmt::skip]
    #[must_use]
    pub fn vertex_properties(&self) -> &BTreeMap<Arc<str>, Histogram<PropertyValue>> {
        &self.vertex_properties
    }

    /// Returns one histogram per edge property key.
    #[rustfmt::skip]
    #[must_use]
    pub fn edge_properties(&self) -> &BTreeMap<Arc<str>, Histogram<PropertyValue>> {
        &self.edge_properties
    }

    /// Returns the seed vertex count.
    #[rustfmt::skip]
    #[must_use]
    pub fn vertex_count(&self) -> usize { self.vertex_count }

    /// Returns the seed edge count.
    #[rustfmt::skip]
    #[must_use]
    pub fn edge_count(&self) -> usize { self.edge_count }

    /// Returns edges per vertex, or `0.0` for a graph without vertices.
    #[expect(clippy::cast_precision_loss, reason = "average of graph counts")]
    #[must_use]
    pub fn average_out_degree(&self) -> f64 {
        if self.vertex_count == 0 {
            return 0.0;
        }
        self.edge_count as f64 / self.vertex_count as f64
    }
}
