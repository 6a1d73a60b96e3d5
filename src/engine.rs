//! The round engine: one call applies one round of the simulation to a population.
//!
//! A round runs these steps in order:
//! 1. clear every agent's `newly_infected` flag;
//! 2. select contacts ([`crate::contact`]);
//! 3. run transmission checks over the contacts ([`crate::transmission`]);
//! 4. age and resolve infections that existed at the start of the round
//!    ([`crate::progression`]).
//!
//! The engine holds no state between calls. Everything it needs is in the population, the
//! parameter snapshot and the random streams passed in.

use log::debug;

use crate::contact::{select_contacts, Contacts};
use crate::error::EpiError;
use crate::parameters::Parameters;
use crate::population::Population;
use crate::progression::progress_infections;
use crate::random::RandomStreams;
use crate::transmission::spread_infection;

/// What happened during one round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    /// The contacts formed this round, for renderers that draw partners.
    pub contacts: Contacts,
    pub new_infections: usize,
    pub recovered: usize,
    pub died: usize,
}

/// Applies one round to `population` in place.
///
/// `parameters` are validated before any agent is touched, so a failed call leaves the
/// population unchanged. Once validation passes the round always completes.
///
/// # Errors
///
/// Returns [`EpiError::InvalidArgument`] if `parameters` fail validation.
pub fn update_population(
    population: &mut Population,
    parameters: &Parameters,
    rngs: &RandomStreams,
) -> Result<RoundOutcome, EpiError> {
    parameters.validate()?;

    for agent in population.agents_mut() {
        agent.newly_infected = false;
    }

    let contacts = select_contacts(population, parameters, rngs);
    let new_infections = spread_infection(population, &contacts, parameters, rngs);
    let progression = progress_infections(population, parameters, rngs);

    debug!(
        "round applied: {} contacts, {} new infections, {} recovered, {} died",
        contacts.len(),
        new_infections,
        progression.recovered,
        progression.died
    );
    debug_assert!(population.check_invariants().is_ok());

    Ok(RoundOutcome {
        contacts,
        new_infections,
        recovered: progression.recovered,
        died: progression.died,
    })
}
