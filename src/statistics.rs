//! Per-round summary statistics.
//!
//! [`compute_statistics`] is a pure linear scan of a population snapshot. [`TRACKED_STATS`] is
//! a declarative manifest of the chartable fields for consumers that plot or tabulate the time
//! series.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

use crate::population::Population;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRecord {
    pub round: u32,
    pub susceptible: usize,
    pub infected: usize,
    pub newly_infected: usize,
    pub recovered: usize,
    pub dead: usize,
    /// Infected agents carrying the asymptomatic flag.
    pub asymptomatic: usize,
    /// Infected agents in quarantine.
    pub quarantined: usize,
}

impl StatisticsRecord {
    /// Number of agents the record was computed over.
    #[must_use]
    pub fn population(&self) -> usize {
        self.susceptible + self.infected + self.recovered + self.dead
    }

    #[must_use]
    pub fn value(&self, field: StatField) -> usize {
        match field {
            StatField::Susceptible => self.susceptible,
            StatField::Infected => self.infected,
            StatField::NewlyInfected => self.newly_infected,
            StatField::Recovered => self.recovered,
            StatField::Dead => self.dead,
            StatField::Asymptomatic => self.asymptomatic,
            StatField::Quarantined => self.quarantined,
        }
    }
}

/// A countable field of [`StatisticsRecord`]. The string form is the record's serialized
/// column name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum StatField {
    Susceptible,
    Infected,
    NewlyInfected,
    Recovered,
    Dead,
    Asymptomatic,
    Quarantined,
}

impl StatField {
    #[must_use]
    pub fn key(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TrackedStat {
    pub label: &'static str,
    pub field: StatField,
}

/// The fields offered for charting, in display order.
pub const TRACKED_STATS: &[TrackedStat] = &[
    TrackedStat {
        label: "Total Infected",
        field: StatField::Infected,
    },
    TrackedStat {
        label: "New Infections",
        field: StatField::NewlyInfected,
    },
    TrackedStat {
        label: "Total Deaths",
        field: StatField::Dead,
    },
    TrackedStat {
        label: "Total Recovered",
        field: StatField::Recovered,
    },
    TrackedStat {
        label: "Asymptomatic Carriers",
        field: StatField::Asymptomatic,
    },
    TrackedStat {
        label: "Quarantined",
        field: StatField::Quarantined,
    },
];

/// Counts agents by state for `round`.
#[must_use]
pub fn compute_statistics(population: &Population, round: u32) -> StatisticsRecord {
    let mut record = StatisticsRecord {
        round,
        ..StatisticsRecord::default()
    };
    for agent in population {
        if agent.is_susceptible() {
            record.susceptible += 1;
        } else if agent.is_infected() {
            record.infected += 1;
            if agent.is_asymptomatic() {
                record.asymptomatic += 1;
            }
            if agent.is_quarantined() {
                record.quarantined += 1;
            }
        } else if agent.is_recovered() {
            record.recovered += 1;
        } else {
            record.dead += 1;
        }
        if agent.is_newly_infected() {
            record.newly_infected += 1;
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentId, DiseaseState};
    use crate::parameters::Parameters;
    use crate::population::create_population;
    use crate::random::RandomStreams;
    use strum::IntoEnumIterator;

    #[test]
    fn counts_partition_the_population() {
        let rngs = RandomStreams::new(2);
        let parameters = Parameters {
            asymptomatic_rate: 100.0,
            ..Parameters::default()
        };
        let mut population = create_population(10, &parameters, &rngs).unwrap();
        for agent in population.agents_mut() {
            agent.state = DiseaseState::Susceptible;
        }
        population.agent_mut(AgentId(0)).state = DiseaseState::infected(0, true);
        population.agent_mut(AgentId(0)).newly_infected = true;
        population.agent_mut(AgentId(1)).state = DiseaseState::infected(0, false);
        population.agent_mut(AgentId(2)).state = DiseaseState::Recovered;
        population.agent_mut(AgentId(3)).state = DiseaseState::Dead;

        let record = compute_statistics(&population, 7);
        assert_eq!(
            record,
            StatisticsRecord {
                round: 7,
                susceptible: 6,
                infected: 2,
                newly_infected: 1,
                recovered: 1,
                dead: 1,
                asymptomatic: 2,
                quarantined: 1,
            }
        );
        assert_eq!(record.population(), population.len());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let rngs = RandomStreams::new(2);
        let population = create_population(50, &Parameters::default(), &rngs).unwrap();
        assert_eq!(
            compute_statistics(&population, 3),
            compute_statistics(&population, 3)
        );
    }

    #[test]
    fn tracked_stats_resolve_against_records() {
        let record = StatisticsRecord {
            round: 1,
            susceptible: 5,
            infected: 4,
            newly_infected: 3,
            recovered: 2,
            dead: 1,
            asymptomatic: 6,
            quarantined: 7,
        };
        let values: Vec<usize> = TRACKED_STATS
            .iter()
            .map(|stat| record.value(stat.field))
            .collect();
        assert_eq!(values, vec![4, 3, 1, 2, 6, 7]);
    }

    #[test]
    fn field_keys_match_serialized_columns() {
        let record = StatisticsRecord::default();
        let json = serde_json::to_value(record).unwrap();
        for field in StatField::iter() {
            assert!(json.get(field.key()).is_some(), "missing {}", field.key());
        }
        assert_eq!(StatField::NewlyInfected.key(), "newlyInfected");
    }
}
