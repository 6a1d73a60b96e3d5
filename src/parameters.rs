//! The configuration record that governs one simulation run.
//!
//! Parameters are plain data. They are loaded from JSON (camelCase keys, missing keys take the
//! defaults below) and validated as a whole before the engine uses them, so a round always runs
//! against one consistent snapshot.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::contact::ContactStrategy;
use crate::error::EpiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Parameters {
    /// Percent chance of transmission per qualifying contact.
    pub infection_chance: f64,
    /// Percent of the population flagged asymptomatic at creation.
    pub asymptomatic_rate: f64,
    /// Rounds infected before resolving to recovered or dead.
    pub recovery_time: u32,
    /// Percent chance that resolution is death rather than recovery.
    pub death_rate: f64,
    /// Rounds before an infected agent becomes infectious.
    pub incubation_period: u32,
    /// Half-width of the uniform window the incubation period is drawn from.
    pub incubation_spread: u32,
    /// Contact distance threshold for the proximity strategy.
    pub max_proximity: f64,
    pub contact_strategy: ContactStrategy,
    /// Percent chance that a newly infected agent is quarantined.
    pub quarantine_chance: f64,
    /// Standard deviation of the per-round positional jitter of paired agents.
    pub movement: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            infection_chance: 55.0,
            asymptomatic_rate: 20.0,
            recovery_time: 30,
            death_rate: 5.0,
            incubation_period: 0,
            incubation_spread: 0,
            max_proximity: 5.0,
            contact_strategy: ContactStrategy::default(),
            quarantine_chance: 0.0,
            movement: 0.0,
        }
    }
}

fn check_percentage(name: &str, value: f64) -> Result<(), EpiError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(EpiError::invalid_argument(format!(
            "{name} must be a percentage in 0..=100, got {value}"
        )))
    }
}

impl Parameters {
    /// Checks every field against its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`EpiError::InvalidArgument`] naming the first offending field.
    pub fn validate(&self) -> Result<(), EpiError> {
        check_percentage("infectionChance", self.infection_chance)?;
        check_percentage("asymptomaticRate", self.asymptomatic_rate)?;
        check_percentage("deathRate", self.death_rate)?;
        check_percentage("quarantineChance", self.quarantine_chance)?;
        if self.recovery_time == 0 {
            return Err(EpiError::invalid_argument(
                "recoveryTime must be at least 1",
            ));
        }
        if !(self.max_proximity.is_finite() && self.max_proximity > 0.0) {
            return Err(EpiError::invalid_argument(format!(
                "maxProximity must be positive, got {}",
                self.max_proximity
            )));
        }
        if !(self.movement.is_finite() && self.movement >= 0.0) {
            return Err(EpiError::invalid_argument(format!(
                "movement must be non-negative, got {}",
                self.movement
            )));
        }
        Ok(())
    }

    /// The inclusive range incubation periods are drawn from.
    #[must_use]
    pub fn incubation_bounds(&self) -> (u32, u32) {
        (
            self.incubation_period.saturating_sub(self.incubation_spread),
            self.incubation_period.saturating_add(self.incubation_spread),
        )
    }

    /// Parses and validates parameters from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, names an unknown field, or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, EpiError> {
        let parameters: Parameters = serde_json::from_str(json)?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Loads and validates parameters from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the JSON is malformed, or the parameters
    /// fail validation.
    pub fn from_json_file(file_path: &Path) -> Result<Self, EpiError> {
        debug!("loading parameters from {}", file_path.display());
        let file = File::open(file_path)?;
        let parameters: Parameters = serde_json::from_reader(BufReader::new(file))?;
        parameters.validate()?;
        Ok(parameters)
    }
}
