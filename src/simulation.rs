//! The driver: owns a population, a parameter snapshot, the random streams, a round counter and
//! the statistics time series. Pacing is up to the caller, who advances the simulation with
//! [`Simulation::step`] or [`Simulation::run`].

use log::{debug, info, trace};

use crate::engine::{update_population, RoundOutcome};
use crate::error::EpiError;
use crate::parameters::Parameters;
use crate::population::{create_population, Population};
use crate::random::RandomStreams;
use crate::statistics::{compute_statistics, StatisticsRecord};

#[derive(Debug)]
pub struct Simulation {
    population: Population,
    parameters: Parameters,
    rngs: RandomStreams,
    round: u32,
    history: Vec<StatisticsRecord>,
    last_outcome: Option<RoundOutcome>,
}

impl Simulation {
    /// Creates a population of `population_size` agents and records its initial state as
    /// round 0.
    ///
    /// # Errors
    ///
    /// Returns [`EpiError::InvalidArgument`] if the size is zero or the parameters are invalid.
    pub fn new(
        population_size: usize,
        parameters: Parameters,
        random_seed: u64,
    ) -> Result<Self, EpiError> {
        let rngs = RandomStreams::new(random_seed);
        let population = create_population(population_size, &parameters, &rngs)?;
        let initial = compute_statistics(&population, 0);
        debug!(
            "created simulation of {population_size} agents with seed {random_seed}"
        );
        Ok(Simulation {
            population,
            parameters,
            rngs,
            round: 0,
            history: vec![initial],
            last_outcome: None,
        })
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn random_seed(&self) -> u64 {
        self.rngs.base_seed()
    }

    /// One record per round, starting with round 0.
    #[must_use]
    pub fn history(&self) -> &[StatisticsRecord] {
        &self.history
    }

    #[must_use]
    pub fn latest(&self) -> &StatisticsRecord {
        // `history` always holds at least the round 0 record.
        &self.history[self.history.len() - 1]
    }

    /// The outcome of the most recent round, including its contacts.
    #[must_use]
    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    /// Replaces the parameters wholesale. They take effect from the next round.
    ///
    /// # Errors
    ///
    /// Returns [`EpiError::InvalidArgument`] and keeps the current parameters if the new ones
    /// are invalid.
    pub fn set_parameters(&mut self, parameters: Parameters) -> Result<(), EpiError> {
        parameters.validate()?;
        trace!("replacing parameters: {parameters:?}");
        self.parameters = parameters;
        Ok(())
    }

    /// Whether the epidemic has burnt out.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.latest().infected == 0
    }

    /// Applies one round and records its statistics.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`update_population`].
    pub fn step(&mut self) -> Result<&StatisticsRecord, EpiError> {
        let outcome = update_population(&mut self.population, &self.parameters, &self.rngs)?;
        self.round += 1;
        let record = compute_statistics(&self.population, self.round);
        trace!("round {}: {:?}", self.round, record);
        self.history.push(record);
        self.last_outcome = Some(outcome);
        Ok(self.latest())
    }

    /// Steps until no agent is infected or `max_rounds` further rounds have run, and returns
    /// the final record.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Simulation::step`].
    pub fn run(&mut self, max_rounds: u32) -> Result<&StatisticsRecord, EpiError> {
        for _ in 0..max_rounds {
            if self.is_finished() {
                info!("no infections remain after round {}", self.round);
                break;
            }
            self.step()?;
        }
        Ok(self.latest())
    }

    /// Replaces the population with a fresh one and clears the history. The random streams
    /// carry on, so a reset produces a different population than the first one.
    ///
    /// # Errors
    ///
    /// Returns [`EpiError::InvalidArgument`] if the size is zero.
    pub fn reset(&mut self, population_size: usize) -> Result<(), EpiError> {
        self.population = create_population(population_size, &self.parameters, &self.rngs)?;
        self.round = 0;
        self.history = vec![compute_statistics(&self.population, 0)];
        self.last_outcome = None;
        debug!("reset simulation to {population_size} agents");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_world() -> Parameters {
        Parameters {
            infection_chance: 60.0,
            recovery_time: 4,
            death_rate: 20.0,
            max_proximity: 15.0,
            ..Parameters::default()
        }
    }

    #[test]
    fn history_starts_at_round_zero() {
        let simulation = Simulation::new(100, small_world(), 1).unwrap();
        assert_eq!(simulation.round(), 0);
        assert_eq!(simulation.history().len(), 1);
        assert_eq!(simulation.latest().round, 0);
        assert_eq!(simulation.latest().infected, 1);
        assert!(simulation.last_outcome().is_none());
    }

    #[test]
    fn step_advances_round_and_history() {
        let mut simulation = Simulation::new(100, small_world(), 1).unwrap();
        let record = *simulation.step().unwrap();
        assert_eq!(record.round, 1);
        assert_eq!(simulation.round(), 1);
        assert_eq!(simulation.history().len(), 2);
        assert!(simulation.last_outcome().is_some());
    }

    #[test]
    fn same_seed_same_history() {
        let mut first = Simulation::new(225, small_world(), 99).unwrap();
        let mut second = Simulation::new(225, small_world(), 99).unwrap();
        first.run(50).unwrap();
        second.run(50).unwrap();
        assert_eq!(first.history(), second.history());
        assert_eq!(first.population(), second.population());
    }

    #[test]
    fn terminal_counts_never_decrease() {
        let mut simulation = Simulation::new(400, small_world(), 12).unwrap();
        simulation.run(60).unwrap();
        for window in simulation.history().windows(2) {
            assert!(window[1].recovered >= window[0].recovered);
            assert!(window[1].dead >= window[0].dead);
            assert_eq!(window[1].population(), 400);
        }
    }

    #[test]
    fn run_stops_once_extinct() {
        let parameters = Parameters {
            infection_chance: 0.0,
            recovery_time: 3,
            ..Parameters::default()
        };
        let mut simulation = Simulation::new(49, parameters, 4).unwrap();
        let record = *simulation.run(100).unwrap();
        assert_eq!(record.infected, 0);
        assert_eq!(record.recovered + record.dead, 1);
        assert_eq!(simulation.round(), 3);
        assert!(simulation.is_finished());
    }

    #[test]
    fn invalid_parameters_are_rejected_and_kept() {
        let mut simulation = Simulation::new(16, small_world(), 0).unwrap();
        let bad = Parameters {
            recovery_time: 0,
            ..Parameters::default()
        };
        assert!(simulation.set_parameters(bad).is_err());
        assert_eq!(simulation.parameters(), &small_world());

        let good = Parameters {
            infection_chance: 10.0,
            ..small_world()
        };
        simulation.set_parameters(good.clone()).unwrap();
        assert_eq!(simulation.parameters(), &good);
    }

    #[test]
    fn reset_clears_history() {
        let mut simulation = Simulation::new(64, small_world(), 5).unwrap();
        simulation.run(5).unwrap();
        simulation.reset(36).unwrap();
        assert_eq!(simulation.round(), 0);
        assert_eq!(simulation.history().len(), 1);
        assert_eq!(simulation.population().len(), 36);
        assert!(simulation.reset(0).is_err());
    }

    #[test]
    fn zero_population_is_rejected() {
        assert!(matches!(
            Simulation::new(0, Parameters::default(), 0),
            Err(EpiError::InvalidArgument(_))
        ));
    }
}
