pub use crate::agent::{Agent, AgentId, DiseaseState, Position};
pub use crate::contact::{ContactStrategy, Contacts};
pub use crate::engine::{update_population, RoundOutcome};
pub use crate::error::EpiError;
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::parameters::Parameters;
pub use crate::population::{create_population, Population};
pub use crate::random::{RandomStreams, RngId};
pub use crate::report::{ReportOptions, ReportWriter};
pub use crate::simulation::Simulation;
pub use crate::statistics::{compute_statistics, StatisticsRecord, TRACKED_STATS};
pub use crate::define_rng;
