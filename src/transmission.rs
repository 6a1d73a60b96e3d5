//! Infection transmission across a round's contacts.

use log::trace;

use crate::agent::DiseaseState;
use crate::contact::Contacts;
use crate::parameters::Parameters;
use crate::population::Population;
use crate::random::{IncubationRng, QuarantineRng, RandomStreams, TransmissionRng};

/// Draws an incubation period uniformly from [`Parameters::incubation_bounds`].
pub fn draw_incubation_period(parameters: &Parameters, rngs: &RandomStreams) -> u32 {
    let (low, high) = parameters.incubation_bounds();
    if low == high {
        return low;
    }
    rngs.sample_range(IncubationRng, low..=high)
}

/// Runs a transmission check for every contact and returns the number of new infections.
///
/// A check happens only when exactly one side of the pair is infected, that side was infectious
/// at the start of the round (past its incubation period), and the other side is susceptible.
/// Agents infected during this call cannot pass the infection on until the next round, so the
/// outcome does not depend on chains forming within the pair order.
pub fn spread_infection(
    population: &mut Population,
    contacts: &Contacts,
    parameters: &Parameters,
    rngs: &RandomStreams,
) -> usize {
    let infectious: Vec<bool> = population
        .iter()
        .map(|agent| agent.is_infectious() && !agent.is_newly_infected())
        .collect();

    let mut new_infections = 0;
    for &(a, b) in contacts.iter() {
        let target = match (infectious[a.index()], infectious[b.index()]) {
            (true, false) => b,
            (false, true) => a,
            _ => continue,
        };
        if !population.agents()[target.index()].is_susceptible() {
            continue;
        }
        if rngs.sample_percent(TransmissionRng, parameters.infection_chance) {
            let incubation_period = draw_incubation_period(parameters, rngs);
            let quarantined = rngs.sample_percent(QuarantineRng, parameters.quarantine_chance);
            let agent = population.agent_mut(target);
            agent.state = DiseaseState::infected(incubation_period, quarantined);
            agent.newly_infected = true;
            new_infections += 1;
        }
    }
    trace!("{new_infections} new infections");
    new_infections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentId;
    use crate::contact::pair_adjacent;
    use crate::population::create_population;

    fn population_with_patient(patient: usize, size: usize) -> Population {
        let rngs = RandomStreams::new(0);
        let mut population = create_population(size, &Parameters::default(), &rngs).unwrap();
        for agent in population.agents_mut() {
            agent.state = DiseaseState::Susceptible;
        }
        population.agent_mut(AgentId(patient)).state = DiseaseState::infected(0, false);
        population
    }

    fn certain() -> Parameters {
        Parameters {
            infection_chance: 100.0,
            ..Parameters::default()
        }
    }

    #[test]
    fn infectious_contact_always_transmits_at_full_chance() {
        let rngs = RandomStreams::new(1);
        let mut population = population_with_patient(0, 4);
        let contacts = pair_adjacent(&[AgentId(0), AgentId(1), AgentId(2), AgentId(3)]);

        assert_eq!(spread_infection(&mut population, &contacts, &certain(), &rngs), 1);
        let infected = population.get(AgentId(1)).unwrap();
        assert!(infected.is_infected());
        assert!(infected.is_newly_infected());
        assert_eq!(infected.days_infected(), 0);
        assert!(population.get(AgentId(2)).unwrap().is_susceptible());
    }

    #[test]
    fn zero_chance_never_transmits() {
        let rngs = RandomStreams::new(1);
        let parameters = Parameters {
            infection_chance: 0.0,
            ..Parameters::default()
        };
        let mut population = population_with_patient(0, 2);
        let contacts = pair_adjacent(&[AgentId(0), AgentId(1)]);
        for _ in 0..100 {
            assert_eq!(
                spread_infection(&mut population, &contacts, &parameters, &rngs),
                0
            );
        }
    }

    #[test]
    fn latent_agents_do_not_transmit() {
        let rngs = RandomStreams::new(1);
        let mut population = population_with_patient(0, 2);
        population.agent_mut(AgentId(0)).state = DiseaseState::Infected {
            days_infected: 1,
            incubation_period: 2,
            quarantined: false,
        };
        let contacts = pair_adjacent(&[AgentId(1), AgentId(0)]);
        assert_eq!(spread_infection(&mut population, &contacts, &certain(), &rngs), 0);

        population.agent_mut(AgentId(0)).state = DiseaseState::Infected {
            days_infected: 2,
            incubation_period: 2,
            quarantined: false,
        };
        assert_eq!(spread_infection(&mut population, &contacts, &certain(), &rngs), 1);
    }

    #[test]
    fn recovered_and_dead_agents_are_immune() {
        let rngs = RandomStreams::new(1);
        let mut population = population_with_patient(0, 3);
        population.agent_mut(AgentId(1)).state = DiseaseState::Recovered;
        population.agent_mut(AgentId(2)).state = DiseaseState::Dead;
        let contacts: Contacts = [(AgentId(0), AgentId(1)), (AgentId(2), AgentId(0))]
            .into_iter()
            .collect();
        assert_eq!(spread_infection(&mut population, &contacts, &certain(), &rngs), 0);
        assert!(population.get(AgentId(1)).unwrap().is_recovered());
        assert!(population.get(AgentId(2)).unwrap().is_dead());
    }

    #[test]
    fn new_infections_do_not_chain_within_a_round() {
        let rngs = RandomStreams::new(1);
        let mut population = population_with_patient(0, 3);
        let contacts: Contacts = [(AgentId(0), AgentId(1)), (AgentId(1), AgentId(2))]
            .into_iter()
            .collect();
        assert_eq!(spread_infection(&mut population, &contacts, &certain(), &rngs), 1);
        assert!(population.get(AgentId(2)).unwrap().is_susceptible());
    }

    #[test]
    fn two_infected_agents_skip_the_check() {
        let rngs = RandomStreams::new(1);
        let mut population = population_with_patient(0, 2);
        population.agent_mut(AgentId(1)).state = DiseaseState::infected(0, false);
        let contacts = pair_adjacent(&[AgentId(0), AgentId(1)]);
        assert_eq!(spread_infection(&mut population, &contacts, &certain(), &rngs), 0);
        assert!(!population.get(AgentId(1)).unwrap().is_newly_infected());
    }

    #[test]
    fn incubation_is_drawn_within_bounds() {
        let rngs = RandomStreams::new(1);
        let parameters = Parameters {
            incubation_period: 4,
            incubation_spread: 2,
            ..Parameters::default()
        };
        let draws: Vec<u32> = (0..500)
            .map(|_| draw_incubation_period(&parameters, &rngs))
            .collect();
        assert!(draws.iter().all(|draw| (2..=6).contains(draw)));
        assert!(draws.contains(&2));
        assert!(draws.contains(&6));

        let fixed = Parameters {
            incubation_period: 3,
            ..Parameters::default()
        };
        assert_eq!(draw_incubation_period(&fixed, &rngs), 3);
    }

    #[test]
    fn full_quarantine_chance_quarantines_every_new_case() {
        let rngs = RandomStreams::new(1);
        let parameters = Parameters {
            quarantine_chance: 100.0,
            ..certain()
        };
        let mut population = population_with_patient(0, 2);
        let contacts = pair_adjacent(&[AgentId(0), AgentId(1)]);
        spread_infection(&mut population, &contacts, &parameters, &rngs);
        assert!(population.get(AgentId(1)).unwrap().is_quarantined());
    }
}
