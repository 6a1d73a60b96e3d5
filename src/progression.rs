//! Disease progression: ageing infections and resolving them to recovery or death.

use log::trace;

use crate::agent::DiseaseState;
use crate::parameters::Parameters;
use crate::population::Population;
use crate::random::{ProgressionRng, RandomStreams};

/// Outcomes of one progression pass.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Progression {
    pub recovered: usize,
    pub died: usize,
}

/// Ages every agent that was infected at the start of the round by one day. Agents infected
/// during the current round (`newly_infected`) start ageing next round.
///
/// An infection that reaches `recovery_time` days resolves: death with probability
/// `death_rate / 100`, recovery otherwise.
pub fn progress_infections(
    population: &mut Population,
    parameters: &Parameters,
    rngs: &RandomStreams,
) -> Progression {
    let mut progression = Progression::default();
    for agent in population.agents_mut() {
        if agent.newly_infected {
            continue;
        }
        let DiseaseState::Infected {
            ref mut days_infected,
            ..
        } = agent.state
        else {
            continue;
        };
        *days_infected += 1;
        if *days_infected >= parameters.recovery_time {
            if rngs.sample_percent(ProgressionRng, parameters.death_rate) {
                agent.state = DiseaseState::Dead;
                progression.died += 1;
            } else {
                agent.state = DiseaseState::Recovered;
                progression.recovered += 1;
            }
        }
    }
    trace!(
        "{} recovered, {} died",
        progression.recovered,
        progression.died
    );
    progression
}
