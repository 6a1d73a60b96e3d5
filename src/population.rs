//! The population model: a fixed-size, ordered collection of agents laid out on a square grid.

use log::trace;

use crate::agent::{Agent, AgentId, DiseaseState, Position, GRID_EXTENT};
use crate::error::EpiError;
use crate::parameters::Parameters;
use crate::random::{PopulationRng, RandomStreams};
use crate::transmission::draw_incubation_period;

/// An ordered collection of agents. Its size never changes: dead agents stay in place with
/// state [`DiseaseState::Dead`], and `agents()[i].id() == AgentId(i)` for every `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    pub(crate) fn agent_mut(&mut self, id: AgentId) -> &mut Agent {
        &mut self.agents[id.index()]
    }

    pub(crate) fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Checks the structural invariants the engine maintains: ids match positions in the
    /// collection, every agent is on the grid, and transient flags only appear on infected
    /// agents.
    ///
    /// # Errors
    ///
    /// Returns [`EpiError::InvariantViolation`] describing the first violation found.
    pub fn check_invariants(&self) -> Result<(), EpiError> {
        for (index, agent) in self.agents.iter().enumerate() {
            if agent.id != AgentId(index) {
                return Err(EpiError::invariant_violation(format!(
                    "agent at index {index} carries id {}",
                    agent.id
                )));
            }
            if !agent.position.is_on_grid() {
                return Err(EpiError::invariant_violation(format!(
                    "agent {} is off the grid at ({}, {})",
                    agent.id, agent.position.x, agent.position.y
                )));
            }
            if agent.newly_infected && !agent.is_infected() {
                return Err(EpiError::invariant_violation(format!(
                    "agent {} is flagged newly infected but is {:?}",
                    agent.id, agent.state
                )));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}

/// Side length of the square grid used to lay out `size` agents.
#[must_use]
pub fn grid_side(size: usize) -> usize {
    // `isqrt` is exact where `(size as f64).sqrt()` can round up near perfect squares.
    size.isqrt().max(1)
}

/// Grid coordinates of the agent at row-major `index`. Indices past the last full square wrap
/// back onto the grid.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn grid_position(index: usize, side: usize) -> Position {
    let column = index % side;
    let row = (index / side) % side;
    Position::new(
        GRID_EXTENT * column as f64 / side as f64,
        GRID_EXTENT * row as f64 / side as f64,
    )
}

/// Creates a population of `size` susceptible agents with exactly one infected agent,
/// patient zero, chosen uniformly at random.
///
/// Each agent is independently flagged asymptomatic with probability
/// `parameters.asymptomatic_rate / 100`. Patient zero's incubation period is drawn from
/// `parameters`.
///
/// # Errors
///
/// Returns [`EpiError::InvalidArgument`] if `size` is zero or `parameters` are invalid.
pub fn create_population(
    size: usize,
    parameters: &Parameters,
    rngs: &RandomStreams,
) -> Result<Population, EpiError> {
    if size == 0 {
        return Err(EpiError::invalid_argument(
            "population size must be positive",
        ));
    }
    parameters.validate()?;

    let side = grid_side(size);
    trace!("creating population of {size} on a {side}x{side} grid");
    let agents = (0..size)
        .map(|index| {
            let asymptomatic = rngs.sample_percent(PopulationRng, parameters.asymptomatic_rate);
            Agent::new(AgentId(index), grid_position(index, side), asymptomatic)
        })
        .collect();
    let mut population = Population { agents };

    let patient_zero = AgentId(rngs.sample_range(PopulationRng, 0..size));
    let incubation_period = draw_incubation_period(parameters, rngs);
    trace!("patient zero is agent {patient_zero}");
    population.agent_mut(patient_zero).state = DiseaseState::infected(incubation_period, false);

    Ok(population)
}
