//! Seeded random streams.
//!
//! Every ant of every iteration samples from its own ChaCha stream keyed by
//! the run seed, so results do not depend on the order in which ants run.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The random number generator used throughout the crate.
pub type ColonyRng = ChaCha8Rng;

/// Creates a generator positioned at stream 0 of `seed`.
pub fn create_rng(seed: u64) -> ColonyRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Creates the generator for one ant of one iteration.
///
/// Stream ids are `iteration * ant_count + ant`, so no two ants of a run
/// ever share a stream.
pub fn ant_rng(seed: u64, iteration: usize, ant: usize, ant_count: usize) -> ColonyRng {
    let mut rng = create_rng(seed);
    let stream = (iteration as u64)
        .wrapping_mul(ant_count as u64)
        .wrapping_add(ant as u64);
    rng.set_stream(stream);
    rng
}
