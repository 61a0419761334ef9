//! Random source for noise draws.
//!
//! Every stochastic entry point has a `*_with_rng` form taking any
//! `R: Rng + ?Sized`, which is what tests and reproducible pipelines should
//! use. The convenience entry points draw from one process-wide generator:
//!
//! - seeded from OS entropy on first use,
//! - [`seed_global`] reseeds it deterministically,
//! - [`reset_global`] returns it to an entropy seed.
//!
//! The global generator is guarded by a mutex and held for the whole
//! duration of a draw sequence, so concurrent fits never interleave draws.

use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Generator used by the process-wide source and by [`rng_from_seed`].
pub type DefaultRng = Xoshiro256PlusPlus;

static GLOBAL_RNG: LazyLock<Mutex<DefaultRng>> =
    LazyLock::new(|| Mutex::new(DefaultRng::from_entropy()));

fn lock_global() -> MutexGuard<'static, DefaultRng> {
    // A panic while holding the lock cannot leave the generator in an
    // invalid state, so poisoning is ignored.
    GLOBAL_RNG.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reseed the process-wide generator.
pub fn seed_global(seed: u64) {
    *lock_global() = DefaultRng::seed_from_u64(seed);
}

/// Reseed the process-wide generator from OS entropy.
pub fn reset_global() {
    *lock_global() = DefaultRng::from_entropy();
}

/// Run `f` with exclusive access to the process-wide generator.
pub fn with_global<T>(f: impl FnOnce(&mut DefaultRng) -> T) -> T {
    let mut rng = lock_global();
    f(&mut rng)
}

/// A fresh deterministic generator, independent of the global one.
pub fn rng_from_seed(seed: u64) -> DefaultRng {
    DefaultRng::seed_from_u64(seed)
}
