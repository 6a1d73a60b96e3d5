use std::any::{Any, TypeId};
use std::cell::{RefCell, RefMut};
use std::fmt;

use log::trace;

use crate::hashing::{hash_str, HashMap};
use crate::rand::distr::uniform::{SampleRange, SampleUniform};
use crate::rand::distr::Distribution;
use crate::rand::seq::SliceRandom;
use crate::rand::{Rng, SeedableRng};
use crate::random::RngId;

// This is a wrapper that allows for future support for different types of
// random number generators (anything that implements SeedableRng is valid).
struct RngHolder {
    rng: Box<dyn Any>,
}

/// Holds a base seed and the set of rngs derived from it, keyed by their [`RngId`].
///
/// Rngs are created lazily the first time they are sampled. The holders live in a `RefCell`
/// so that sampling only needs a shared reference, which lets the engine read the population
/// configuration and draw random numbers at the same time. A sampler closure must not sample
/// from the same stream it is running on.
pub struct RandomStreams {
    base_seed: u64,
    rng_holders: RefCell<HashMap<TypeId, RngHolder>>,
}

impl RandomStreams {
    #[must_use]
    pub fn new(base_seed: u64) -> Self {
        trace!("initializing random streams (seed={base_seed})");
        RandomStreams {
            base_seed,
            rng_holders: RefCell::new(HashMap::default()),
        }
    }

    #[must_use]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Replaces the base seed. Existing rngs are dropped so they get re-seeded the next time
    /// they are sampled.
    pub fn reseed(&mut self, base_seed: u64) {
        self.base_seed = base_seed;
        self.rng_holders.get_mut().clear();
    }

    /// Gets a mutable reference to the random number generator associated with the given
    /// [`RngId`]. If the rng has not been used before, one will be created from the base seed.
    fn get_rng<R: RngId + 'static>(&self) -> RefMut<R::RngType> {
        let base_seed = self.base_seed;
        let rng_holders = self.rng_holders.borrow_mut();
        RefMut::map(rng_holders, |holders| {
            holders
                .entry(TypeId::of::<R>())
                // Create a new rng holder if it doesn't exist yet
                .or_insert_with(|| {
                    trace!("creating new RNG {} (seed={})", R::get_name(), base_seed);
                    let seed_offset = hash_str(R::get_name());
                    RngHolder {
                        rng: Box::new(R::RngType::seed_from_u64(
                            base_seed.wrapping_add(seed_offset),
                        )),
                    }
                })
                .rng
                .downcast_mut::<R::RngType>()
                .unwrap()
        })
    }

    /// Gets a random sample from the random number generator associated with the given
    /// [`RngId`] by applying the specified sampler function.
    pub fn sample<R: RngId + 'static, T>(
        &self,
        _rng_type: R,
        sampler: impl FnOnce(&mut R::RngType) -> T,
    ) -> T {
        let mut rng = self.get_rng::<R>();
        sampler(&mut rng)
    }

    /// Gets a random sample from the specified distribution using the random number generator
    /// associated with the given [`RngId`].
    pub fn sample_distr<R: RngId + 'static, T>(
        &self,
        _rng_type: R,
        distribution: impl Distribution<T>,
    ) -> T
    where
        R::RngType: Rng,
    {
        let mut rng = self.get_rng::<R>();
        distribution.sample::<R::RngType>(&mut rng)
    }

    /// Gets a random sample within the range provided by `range`
    /// using the generator associated with the given [`RngId`].
    pub fn sample_range<R: RngId + 'static, S, T>(&self, rng_id: R, range: S) -> T
    where
        R::RngType: Rng,
        S: SampleRange<T>,
        T: SampleUniform,
    {
        self.sample(rng_id, |rng| rng.random_range(range))
    }

    /// Gets a random boolean value which is true with probability `p`
    /// using the generator associated with the given [`RngId`].
    pub fn sample_bool<R: RngId + 'static>(&self, rng_id: R, p: f64) -> bool
    where
        R::RngType: Rng,
    {
        self.sample(rng_id, |rng| rng.random_bool(p))
    }

    /// Draws a uniform value in `[0, 100)` and reports whether it falls below `percent`.
    /// A `percent` of 0 never succeeds and a `percent` of 100 always does.
    pub fn sample_percent<R: RngId + 'static>(&self, rng_id: R, percent: f64) -> bool
    where
        R::RngType: Rng,
    {
        self.sample_range(rng_id, 0.0..100.0) < percent
    }

    /// Shuffles `items` in place with a uniform (Fisher-Yates) permutation.
    pub fn shuffle<R: RngId + 'static, T>(&self, rng_id: R, items: &mut [T])
    where
        R::RngType: Rng,
    {
        self.sample(rng_id, |rng| items.shuffle(rng));
    }
}

impl fmt::Debug for RandomStreams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomStreams")
            .field("base_seed", &self.base_seed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_rng;
    use crate::rand::RngCore;
    use rand_distr::Normal;

    define_rng!(FooRng);
    define_rng!(BarRng);

    #[test]
    fn get_rng_basic() {
        let streams = RandomStreams::new(42);

        assert_ne!(
            streams.sample(FooRng, RngCore::next_u64),
            streams.sample(FooRng, RngCore::next_u64)
        );
    }

    #[test]
    fn multiple_rng_types() {
        let streams = RandomStreams::new(42);

        assert_ne!(
            streams.sample(FooRng, RngCore::next_u64),
            streams.sample(BarRng, RngCore::next_u64)
        );
    }

    #[test]
    fn streams_are_independent() {
        let first = RandomStreams::new(7);
        let second = RandomStreams::new(7);

        // Draining one stream on `second` must not shift what `FooRng` produces.
        for _ in 0..100 {
            second.sample(BarRng, RngCore::next_u64);
        }
        assert_eq!(
            first.sample(FooRng, RngCore::next_u64),
            second.sample(FooRng, RngCore::next_u64)
        );
    }

    #[test]
    fn reset_seed() {
        let mut streams = RandomStreams::new(42);

        let run_0 = streams.sample(FooRng, RngCore::next_u64);
        let run_1 = streams.sample(FooRng, RngCore::next_u64);

        // Reset with same seed, ensure we get the same values
        streams.reseed(42);
        assert_eq!(run_0, streams.sample(FooRng, RngCore::next_u64));
        assert_eq!(run_1, streams.sample(FooRng, RngCore::next_u64));

        // Reset with different seed, ensure we get different values
        streams.reseed(88);
        assert_eq!(streams.base_seed(), 88);
        assert_ne!(run_0, streams.sample(FooRng, RngCore::next_u64));
        assert_ne!(run_1, streams.sample(FooRng, RngCore::next_u64));
    }

    #[test]
    fn sample_range() {
        let streams = RandomStreams::new(42);
        let result = streams.sample_range(FooRng, 0..10);
        assert!((0..10).contains(&result));
    }

    #[test]
    fn sample_bool() {
        let streams = RandomStreams::new(42);
        assert!(streams.sample_bool(FooRng, 1.0));
        assert!(!streams.sample_bool(FooRng, 0.0));
    }

    #[test]
    fn sample_percent_bounds() {
        let streams = RandomStreams::new(42);
        for _ in 0..1000 {
            assert!(streams.sample_percent(FooRng, 100.0));
            assert!(!streams.sample_percent(FooRng, 0.0));
        }
    }

    #[test]
    fn sample_percent_frequency() {
        let streams = RandomStreams::new(42);
        let n_samples = 10_000;
        let hits = (0..n_samples)
            .filter(|_| streams.sample_percent(FooRng, 25.0))
            .count();
        // The expected value of `hits` is 2500.
        assert!((hits as i64 - 2500).abs() < 200);
    }

    #[test]
    fn sample_distribution() {
        let streams = RandomStreams::new(42);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let n_samples = 3000;
        let mean = (0..n_samples)
            .map(|_| streams.sample_distr(FooRng, normal))
            .sum::<f64>()
            / f64::from(n_samples);
        assert!(mean.abs() < 0.1);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let streams = RandomStreams::new(42);
        let mut items: Vec<usize> = (0..50).collect();
        streams.shuffle(FooRng, &mut items);
        assert_ne!(items, (0..50).collect::<Vec<_>>());
        items.sort_unstable();
        assert_eq!(items, (0..50).collect::<Vec<_>>());
    }
}
