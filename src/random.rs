//! Random number generation for sub-pixel jitter.
//!
//! Each rendering thread owns a ChaCha20 PRNG seeded from the OS, so no
//! generator state is shared between pixels.

use rand::{Rng, SeedableRng, rng};
use rand_chacha::ChaCha20Rng;
use std::cell::RefCell;

thread_local! {
    /// Thread-local ChaCha20 PRNG for quality random numbers.
    static RNG: RefCell<ChaCha20Rng> = RefCell::new(ChaCha20Rng::from_rng(&mut rng()));
}

/// Generate a random f32 in [0.0, 1.0)
pub fn random_f32() -> f32 {
    RNG.with(|rng| rng.borrow_mut().random())
}

/// Random offset within the [-0.5, 0.5) pixel square.
pub fn sample_square() -> (f32, f32) {
    (random_f32() - 0.5, random_f32() - 0.5)
}
