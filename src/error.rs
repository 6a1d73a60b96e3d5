use std::fmt::{self, Display};
use std::io;

/// Provides `EpiError` and maps to other errors to
/// convert to an `EpiError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum EpiError {
    /// A caller handed the engine a value outside its domain: a non-positive
    /// population size, a percentage outside `0..=100`, and so on.
    InvalidArgument(String),
    /// The population was observed in a state the engine never produces.
    /// Seeing this indicates a bug, not a runtime condition.
    InvariantViolation(String),
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    ReportError(String),
}

impl EpiError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        EpiError::InvalidArgument(message.into())
    }

    pub(crate) fn invariant_violation(message: impl Into<String>) -> Self {
        EpiError::InvariantViolation(message.into())
    }
}

impl From<io::Error> for EpiError {
    fn from(error: io::Error) -> Self {
        EpiError::IoError(error)
    }
}

impl From<serde_json::Error> for EpiError {
    fn from(error: serde_json::Error) -> Self {
        EpiError::JsonError(error)
    }
}

impl From<csv::Error> for EpiError {
    fn from(error: csv::Error) -> Self {
        EpiError::CsvError(error)
    }
}

impl std::error::Error for EpiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EpiError::IoError(error) => Some(error),
            EpiError::JsonError(error) => Some(error),
            EpiError::CsvError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for EpiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EpiError::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            EpiError::InvariantViolation(message) => {
                write!(f, "invariant violation: {message}")
            }
            EpiError::IoError(error) => write!(f, "I/O error: {error}"),
            EpiError::JsonError(error) => write!(f, "JSON error: {error}"),
            EpiError::CsvError(error) => write!(f, "CSV error: {error}"),
            EpiError::ReportError(message) => write!(f, "report error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        let error = EpiError::invalid_argument("population size must be positive");
        assert_eq!(
            error.to_string(),
            "invalid argument: population size must be positive"
        );
    }

    #[test]
    fn io_errors_convert() {
        let error: EpiError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(error, EpiError::IoError(_)));
        assert!(std::error::Error::source(&error).is_some());
    }
}
