//! Agents: one simulated individual with a position and an epidemiological state.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Side length of the unit grid agents live on. Coordinates lie in `[0, GRID_EXTENT)`.
pub const GRID_EXTENT: f64 = 100.0;

/// Stable identifier of an agent, equal to its row-major index in the initial grid and to its
/// index in the owning [`Population`](crate::population::Population).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub usize);

impl AgentId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    #[must_use]
    pub fn distance_squared(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn distance(&self, other: &Position) -> f64 {
        self.distance_squared(other).sqrt()
    }

    #[must_use]
    pub fn is_on_grid(&self) -> bool {
        (0.0..GRID_EXTENT).contains(&self.x) && (0.0..GRID_EXTENT).contains(&self.y)
    }
}

/// Epidemiological state. The variants are mutually exclusive by construction; `Recovered` and
/// `Dead` are terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiseaseState {
    Susceptible,
    Infected {
        /// Rounds spent infected so far.
        days_infected: u32,
        /// Rounds before the agent becomes infectious.
        incubation_period: u32,
        /// Quarantined agents are excluded from contact selection.
        quarantined: bool,
    },
    Recovered,
    Dead,
}

impl DiseaseState {
    #[must_use]
    pub fn infected(incubation_period: u32, quarantined: bool) -> Self {
        DiseaseState::Infected {
            days_infected: 0,
            incubation_period,
            quarantined,
        }
    }

    /// A short label for reports.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            DiseaseState::Susceptible => "S",
            DiseaseState::Infected { .. } => "I",
            DiseaseState::Recovered => "R",
            DiseaseState::Dead => "D",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub(crate) id: AgentId,
    pub(crate) position: Position,
    pub(crate) state: DiseaseState,
    pub(crate) asymptomatic: bool,
    pub(crate) newly_infected: bool,
}

impl Agent {
    #[must_use]
    pub fn new(id: AgentId, position: Position, asymptomatic: bool) -> Self {
        Agent {
            id,
            position,
            state: DiseaseState::Susceptible,
            asymptomatic,
            newly_infected: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn state(&self) -> DiseaseState {
        self.state
    }

    #[must_use]
    pub fn is_asymptomatic(&self) -> bool {
        self.asymptomatic
    }

    /// True only for agents infected during the most recent round.
    #[must_use]
    pub fn is_newly_infected(&self) -> bool {
        self.newly_infected
    }

    #[must_use]
    pub fn is_susceptible(&self) -> bool {
        matches!(self.state, DiseaseState::Susceptible)
    }

    #[must_use]
    pub fn is_infected(&self) -> bool {
        matches!(self.state, DiseaseState::Infected { .. })
    }

    #[must_use]
    pub fn is_recovered(&self) -> bool {
        matches!(self.state, DiseaseState::Recovered)
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        matches!(self.state, DiseaseState::Dead)
    }

    #[must_use]
    pub fn is_quarantined(&self) -> bool {
        matches!(
            self.state,
            DiseaseState::Infected {
                quarantined: true,
                ..
            }
        )
    }

    /// Infected and past the latent phase.
    #[must_use]
    pub fn is_infectious(&self) -> bool {
        match self.state {
            DiseaseState::Infected {
                days_infected,
                incubation_period,
                ..
            } => days_infected >= incubation_period,
            _ => false,
        }
    }

    /// Rounds spent infected. Reads 0 for agents that are not infected.
    #[must_use]
    pub fn days_infected(&self) -> u32 {
        match self.state {
            DiseaseState::Infected { days_infected, .. } => days_infected,
            _ => 0,
        }
    }

    #[must_use]
    pub fn incubation_period(&self) -> Option<u32> {
        match self.state {
            DiseaseState::Infected {
                incubation_period, ..
            } => Some(incubation_period),
            _ => None,
        }
    }

    /// Whether this agent can take part in contacts this round.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        !self.is_dead() && !self.is_quarantined()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(30.0, 40.0);
        assert_relative_eq!(a.distance(&b), 50.0);
        assert_relative_eq!(b.distance_squared(&a), 2500.0);
    }

    #[test]
    fn grid_bounds_are_half_open() {
        assert!(Position::new(0.0, 99.9).is_on_grid());
        assert!(!Position::new(100.0, 0.0).is_on_grid());
        assert!(!Position::new(-0.1, 0.0).is_on_grid());
    }

    #[test]
    fn latent_agents_are_not_infectious() {
        let mut agent = Agent::new(AgentId(0), Position::new(0.0, 0.0), false);
        assert!(!agent.is_infectious());
        assert_eq!(agent.days_infected(), 0);
        assert_eq!(agent.incubation_period(), None);

        agent.state = DiseaseState::infected(2, false);
        assert!(agent.is_infected());
        assert!(!agent.is_infectious());

        agent.state = DiseaseState::Infected {
            days_infected: 2,
            incubation_period: 2,
            quarantined: false,
        };
        assert!(agent.is_infectious());
        assert_eq!(agent.incubation_period(), Some(2));
    }

    #[test]
    fn quarantined_and_dead_agents_are_not_mobile() {
        let mut agent = Agent::new(AgentId(3), Position::new(1.0, 1.0), true);
        assert!(agent.is_mobile());

        agent.state = DiseaseState::infected(0, true);
        assert!(agent.is_quarantined());
        assert!(!agent.is_mobile());

        agent.state = DiseaseState::Recovered;
        assert!(agent.is_mobile());
        assert_eq!(agent.days_infected(), 0);

        agent.state = DiseaseState::Dead;
        assert!(!agent.is_mobile());
        assert_eq!(agent.state().label(), "D");
    }
}
