//! CSV reports of simulation output.
//!
//! A report is a CSV file with one row per serialized item. The runner writes two reports: the
//! `statistics` time series (one [`StatisticsRecord`] per round) and an optional `population`
//! snapshot (one [`AgentReportItem`] per agent).

use std::fs::{create_dir_all, File};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use csv::Writer;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::error::EpiError;
use crate::population::Population;
use crate::statistics::StatisticsRecord;

/// Where and how report files are created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub directory: PathBuf,
    pub file_prefix: String,
    pub overwrite: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            directory: PathBuf::from("."),
            file_prefix: String::new(),
            overwrite: false,
        }
    }
}

impl ReportOptions {
    /// Sets the directory reports are written to.
    pub fn directory(&mut self, directory: PathBuf) -> &mut Self {
        self.directory = directory;
        self
    }

    /// Sets a prefix prepended to every report file name.
    pub fn file_prefix(&mut self, file_prefix: String) -> &mut Self {
        self.file_prefix = file_prefix;
        self
    }

    /// Allows existing report files to be replaced.
    pub fn overwrite(&mut self, overwrite: bool) -> &mut Self {
        self.overwrite = overwrite;
        self
    }

    /// The path of the report called `short_name`.
    #[must_use]
    pub fn path_for(&self, short_name: &str) -> PathBuf {
        self.directory
            .join(format!("{}{}.csv", self.file_prefix, short_name))
    }
}

// Creates the file and all parent directories if they do not exist. Refuses to replace an
// existing file unless `overwrite` is set.
fn create_report_file(path: &Path, overwrite: bool) -> Result<File, EpiError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    if path.exists() && !overwrite {
        return Err(EpiError::ReportError(format!(
            "report file {} already exists; pass overwrite to replace it",
            path.display()
        )));
    }
    Ok(File::create(path)?)
}

/// Writes rows of `T` to a CSV file, flushing after every row so the file is complete at any
/// point the driver stops.
pub struct ReportWriter<T: Serialize> {
    writer: Writer<File>,
    path: PathBuf,
    rows: usize,
    _item: PhantomData<T>,
}

impl<T: Serialize> ReportWriter<T> {
    /// Opens the report called `short_name` under `options`.
    ///
    /// # Errors
    ///
    /// Returns an `EpiError` if the file exists and `overwrite` is off, or it cannot be created.
    pub fn create(options: &ReportOptions, short_name: &str) -> Result<Self, EpiError> {
        let path = options.path_for(short_name);
        trace!("opening report {}", path.display());
        let file = create_report_file(&path, options.overwrite)?;
        Ok(ReportWriter {
            writer: Writer::from_writer(file),
            path,
            rows: 0,
            _item: PhantomData,
        })
    }

    /// Writes one row.
    ///
    /// # Errors
    ///
    /// Returns an `EpiError` if serialization or the write fails.
    pub fn send(&mut self, item: &T) -> Result<(), EpiError> {
        self.writer.serialize(item)?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Writes every item in order.
    ///
    /// # Errors
    ///
    /// Returns an `EpiError` if serialization or a write fails.
    pub fn send_all<'a>(&mut self, items: impl IntoIterator<Item = &'a T>) -> Result<(), EpiError>
    where
        T: 'a,
    {
        for item in items {
            self.send(item)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// One row of the population snapshot report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReportItem {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub state: String,
    pub days_infected: u32,
    pub asymptomatic: bool,
    pub newly_infected: bool,
    pub quarantined: bool,
}

impl From<&Agent> for AgentReportItem {
    fn from(agent: &Agent) -> Self {
        let position = agent.position();
        AgentReportItem {
            id: agent.id().index(),
            x: position.x,
            y: position.y,
            state: agent.state().label().to_string(),
            days_infected: agent.days_infected(),
            asymptomatic: agent.is_asymptomatic(),
            newly_infected: agent.is_newly_infected(),
            quarantined: agent.is_quarantined(),
        }
    }
}

/// Writes the statistics time series to the `statistics` report.
///
/// # Errors
///
/// Returns an `EpiError` if the report cannot be created or written.
pub fn write_statistics(
    options: &ReportOptions,
    history: &[StatisticsRecord],
) -> Result<PathBuf, EpiError> {
    let mut report = ReportWriter::<StatisticsRecord>::create(options, "statistics")?;
    report.send_all(history)?;
    Ok(report.path().to_path_buf())
}

/// Writes one row per agent to the `population` report.
///
/// # Errors
///
/// Returns an `EpiError` if the report cannot be created or written.
pub fn write_population(
    options: &ReportOptions,
    population: &Population,
) -> Result<PathBuf, EpiError> {
    let mut report = ReportWriter::<AgentReportItem>::create(options, "population")?;
    for agent in population {
        report.send(&AgentReportItem::from(agent))?;
    }
    Ok(report.path().to_path_buf())
}
