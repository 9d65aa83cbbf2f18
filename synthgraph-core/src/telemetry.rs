//! Counters emitted when the `metrics` feature is enabled.

#[cfg(feature = "metrics")]
pub(crate) fn record_round(new_edges: usize) {
    metrics::counter!("synthesis_rounds_completed").increment(1);
    record_edges(new_edges);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_round(_new_edges: usize) {}

#[cfg(feature = "metrics")]
pub(crate) fn record_edges(new_edges: usize) {
    metrics::counter!("synthesis_edges_generated").increment(new_edges as u64);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_edges(_new_edges: usize) {}

#[cfg(feature = "metrics")]
pub(crate) fn record_evaluation(metric: &'static str) {
    metrics::counter!("veracity_evaluations", "metric" => metric).increment(1);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_evaluation(_metric: &'static str) {}
