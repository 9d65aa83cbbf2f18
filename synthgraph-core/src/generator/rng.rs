//! Deterministic RNG streams for parallel generation.
//!
//! Every unit of parallel work (a new vertex in an attachment round, a source
//! row or a draw batch in the Kronecker expander) gets its own `SmallRng`
//! seeded from the run seed and the unit's coordinates, so output does not
//! depend on how rayon schedules the work.

use rand::{SeedableRng, rngs::SmallRng};

/// SplitMix64 increment (the 64-bit golden ratio) used for stream separation.
const STREAM_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(STREAM_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

#[inline]
pub(crate) fn mix_stream(base_seed: u64, stream: u64) -> u64 {
    splitmix64(base_seed ^ stream.wrapping_add(1).wrapping_mul(STREAM_SPACING))
}

/// Returns the RNG for unit `ordinal` of phase `phase`.
pub(crate) fn stream_rng(base_seed: u64, phase: u64, ordinal: u64) -> SmallRng {
    SmallRng::seed_from_u64(mix_stream(mix_stream(base_seed, phase), ordinal))
}
