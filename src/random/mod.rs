//! Named random number streams.
//!
//! Every source of randomness in the engine draws from its own stream, keyed by a zero-sized
//! [`RngId`] type declared with [`define_rng!`]. Each stream is seeded from a single base seed
//! plus a stable hash of the stream's name, so a run is reproducible from the base seed alone and
//! adding draws to one stream never shifts the values seen by another.
mod macros;
mod streams;

pub use macros::define_rng;
pub use streams::RandomStreams;

use crate::rand::SeedableRng;

pub trait RngId: Copy + Clone {
    type RngType: SeedableRng;
    fn get_name() -> &'static str;
}

// The streams drawn by the round engine.
define_rng!(pub PopulationRng);
define_rng!(pub IncubationRng);
define_rng!(pub ContactRng);
define_rng!(pub TransmissionRng);
define_rng!(pub QuarantineRng);
define_rng!(pub ProgressionRng);
define_rng!(pub MovementRng);
