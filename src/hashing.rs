//! Deterministic hashing. The standard library hasher is randomly seeded per process, which
//! would make the per-stream seeds in [`crate::random`] differ between runs. `xxh3` is stable
//! across runs and platforms.

use xxhash_rust::xxh3::xxh3_64;

pub use rustc_hash::FxHashMap as HashMap;

/// A convenience method to compute the hash of a `&str`.
#[must_use]
pub fn hash_str(data: &str) -> u64 {
    xxh3_64(data.as_bytes())
}
