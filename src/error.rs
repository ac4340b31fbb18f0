//! Error types for the payroll engine.
//!
//! Errors fall into two classes. Configuration errors mean the regulatory
//! reference data for a period is missing or malformed; they are fatal to any
//! computation that needs that data. Record errors mean one employee's data
//! cannot be processed; they are fatal only to that employee.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ParametersNotFound {
///     parameter: "indicators".to_string(),
///     period: "2025-01".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Regulatory parameter 'indicators' not found for period 2025-01"
/// );
/// assert!(error.is_configuration());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A required regulatory parameter is absent for the period.
    #[error("Regulatory parameter '{parameter}' not found for period {period}")]
    ParametersNotFound {
        /// Name of the missing parameter (e.g. "indicators", "pension_rate:Habitat").
        parameter: String,
        /// The period, formatted as `YYYY-MM`.
        period: String,
    },

    /// A regulatory parameter is present but cannot be used.
    #[error("Malformed regulatory parameter '{parameter}' for period {period}: {message}")]
    MalformedParameter {
        /// Name of the malformed parameter.
        parameter: String,
        /// The period, formatted as `YYYY-MM`.
        period: String,
        /// What is wrong with it.
        message: String,
    },

    /// An employee record cannot be computed.
    #[error("Invalid employee '{employee_id}' field '{field}': {message}")]
    InvalidEmployee {
        /// The employee the error belongs to.
        employee_id: String,
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A period outside the calendar was requested.
    #[error("Invalid period {year}-{month:02}")]
    InvalidPeriod {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Returns true when the error stems from regulatory reference data rather
    /// than from a single employee's record.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::ConfigNotFound { .. }
                | EngineError::ConfigParseError { .. }
                | EngineError::ParametersNotFound { .. }
                | EngineError::MalformedParameter { .. }
        )
    }

    /// Returns the employee id for record-level errors.
    pub fn employee_id(&self) -> Option<&str> {
        match self {
            EngineError::InvalidEmployee { employee_id, .. } => Some(employee_id),
            _ => None,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
