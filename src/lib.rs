//! A discrete-time, agent-based epidemic simulator.
//!
//! A fixed population of agents is laid out on a grid in a 100 × 100 unit square. One agent,
//! patient zero, starts infected. Each round of the simulation:
//! * resets the per-round "newly infected" flags,
//! * pairs up the agents that can move, either by adjacency in a shuffled order or by
//!   proximity on the grid,
//! * gives every pair with exactly one infectious member a chance to transmit the disease,
//! * ages every infection and resolves the ones that have run their course into recovery or
//!   death.
//!
//! [`Simulation`] drives the rounds and keeps a per-round [`StatisticsRecord`] time series;
//! the lower level operations ([`create_population`], [`update_population`],
//! [`compute_statistics`]) can also be used directly. All randomness flows through named
//! streams in [`random`], seeded from one base seed, so every run is reproducible.
//!
//! The `epigrid` binary wraps this crate in a headless command line runner ([`runner`]) that
//! writes CSV reports ([`report`]).
pub mod agent;
pub mod contact;
pub mod engine;
pub mod error;
pub mod execution_stats;
pub mod hashing;
pub mod log;
pub mod parameters;
pub mod population;
pub mod prelude;
pub mod progression;
pub mod random;
pub mod report;
pub mod runner;
pub mod simulation;
pub mod statistics;
pub mod transmission;

pub use agent::{Agent, AgentId, DiseaseState, Position, GRID_EXTENT};
pub use contact::{ContactStrategy, Contacts};
pub use engine::{update_population, RoundOutcome};
pub use error::EpiError;
pub use parameters::Parameters;
pub use population::{create_population, Population};
pub use runner::{run_with_args, BaseArgs};
pub use simulation::Simulation;
pub use statistics::{compute_statistics, StatField, StatisticsRecord, TrackedStat, TRACKED_STATS};

// Re-exports for use by `define_rng!`.
pub use paste;
pub use rand;
