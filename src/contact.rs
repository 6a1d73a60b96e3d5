//! Contact selection: which pairs of agents are eligible for a transmission check in a round.
//!
//! Two strategies are provided. Both start from a uniformly random permutation of the mobile
//! agents (living and not quarantined), drawn from [`ContactRng`].
//!
//! * [`ContactStrategy::AdjacentPairing`] pairs consecutive agents of the permutation. With an
//!   odd number of agents the last one sits the round out.
//! * [`ContactStrategy::Proximity`] scans every unordered pair of the permutation and keeps
//!   those strictly closer than `maxProximity`. The scan is O(n²) per round, which is accepted
//!   for populations of a few thousand agents.

use log::trace;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, Position, GRID_EXTENT};
use crate::parameters::Parameters;
use crate::population::Population;
use crate::random::{ContactRng, MovementRng, RandomStreams};

#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ContactStrategy {
    AdjacentPairing,
    #[default]
    Proximity,
}

/// The contacts of one round, in the order they were formed. This is a transient lookup: it is
/// rebuilt every round and never stored on the agents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contacts {
    pairs: Vec<(AgentId, AgentId)>,
}

impl Contacts {
    #[must_use]
    pub fn pairs(&self) -> &[(AgentId, AgentId)] {
        &self.pairs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Every agent `id` was in contact with this round.
    pub fn partners(&self, id: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        self.pairs.iter().filter_map(move |&(a, b)| {
            if a == id {
                Some(b)
            } else if b == id {
                Some(a)
            } else {
                None
            }
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &(AgentId, AgentId)> {
        self.pairs.iter()
    }
}

impl FromIterator<(AgentId, AgentId)> for Contacts {
    fn from_iter<I: IntoIterator<Item = (AgentId, AgentId)>>(iter: I) -> Self {
        Contacts {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Selects this round's contacts according to `parameters.contact_strategy`. With the
/// adjacent-pairing strategy and a positive `movement`, paired agents are also jittered.
pub fn select_contacts(
    population: &mut Population,
    parameters: &Parameters,
    rngs: &RandomStreams,
) -> Contacts {
    let mut order: Vec<AgentId> = population
        .iter()
        .filter(|agent| agent.is_mobile())
        .map(|agent| agent.id())
        .collect();
    rngs.shuffle(ContactRng, &mut order);

    let contacts = match parameters.contact_strategy {
        ContactStrategy::AdjacentPairing => {
            let contacts = pair_adjacent(&order);
            if parameters.movement > 0.0 {
                jitter_positions(population, &contacts, parameters.movement, rngs);
            }
            contacts
        }
        ContactStrategy::Proximity => {
            pair_by_proximity(population, &order, parameters.max_proximity)
        }
    };
    trace!(
        "selected {} contacts among {} mobile agents",
        contacts.len(),
        order.len()
    );
    contacts
}

/// Pairs `(order[2k], order[2k + 1])`. An odd agent out is left without a contact.
#[must_use]
pub fn pair_adjacent(order: &[AgentId]) -> Contacts {
    order
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

/// Every pair `(order[i], order[j])` with `i < j` whose distance is strictly below
/// `max_proximity`.
#[must_use]
pub fn pair_by_proximity(
    population: &Population,
    order: &[AgentId],
    max_proximity: f64,
) -> Contacts {
    let threshold = max_proximity * max_proximity;
    let positions: Vec<Position> = order
        .iter()
        .map(|&id| population.agents()[id.index()].position())
        .collect();

    let mut pairs = Vec::new();
    for (i, first) in positions.iter().enumerate() {
        for (j, second) in positions.iter().enumerate().skip(i + 1) {
            if first.distance_squared(second) < threshold {
                pairs.push((order[i], order[j]));
            }
        }
    }
    Contacts { pairs }
}

/// Maps a coordinate onto `[0, GRID_EXTENT)`, treating the grid as a torus.
fn wrap_coordinate(value: f64) -> f64 {
    let wrapped = value.rem_euclid(GRID_EXTENT);
    // `rem_euclid` can round up to the modulus for tiny negative inputs.
    if wrapped >= GRID_EXTENT {
        0.0
    } else {
        wrapped
    }
}

/// Moves every paired agent by Gaussian noise with standard deviation `movement`. Purely
/// cosmetic; draws come from [`MovementRng`] so infection outcomes are unaffected.
fn jitter_positions(
    population: &mut Population,
    contacts: &Contacts,
    movement: f64,
    rngs: &RandomStreams,
) {
    let Ok(step) = Normal::new(0.0, movement) else {
        return;
    };
    for &(a, b) in contacts.iter() {
        for id in [a, b] {
            let dx = rngs.sample_distr(MovementRng, step);
            let dy = rngs.sample_distr(MovementRng, step);
            let agent = population.agent_mut(id);
            agent.position = Position::new(
                wrap_coordinate(agent.position.x + dx),
                wrap_coordinate(agent.position.y + dy),
            );
        }
    }
}
