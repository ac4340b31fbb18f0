//! Personnel movement codes.
//!
//! A movement records whether the employee was hired and/or terminated
//! inside the exported month.

use chrono::NaiveDate;

use crate::models::PayrollPeriod;

/// Date pattern used by movement date fields.
pub const MOVEMENT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Hire and termination events inside a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Neither the start nor the end of the contract falls in the month.
    None,
    /// The contract started in the month.
    Hire {
        /// Contract start.
        start: NaiveDate,
    },
    /// The contract ended in the month.
    Termination {
        /// Contract end.
        end: NaiveDate,
    },
    /// The contract both started and ended in the month.
    HireAndTermination {
        /// Contract start.
        start: NaiveDate,
        /// Contract end.
        end: NaiveDate,
    },
}

impl Movement {
    /// Derives the movement from the contract dates.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::export::Movement;
    /// use payroll_engine::models::PayrollPeriod;
    /// use chrono::NaiveDate;
    ///
    /// let period = PayrollPeriod::new(2025, 3).unwrap();
    /// let start = NaiveDate::from_ymd_opt(2025, 3, 15);
    /// let movement = Movement::derive(start, None, &period);
    ///
    /// assert_eq!(movement.code(), 1);
    /// assert_eq!(movement.start_text(), "15-03-2025");
    /// assert_eq!(movement.end_text(), "");
    /// ```
    pub fn derive(
        contract_start: Option<NaiveDate>,
        contract_end: Option<NaiveDate>,
        period: &PayrollPeriod,
    ) -> Self {
        let start = contract_start.filter(|d| period.contains(*d));
        let end = contract_end.filter(|d| period.contains(*d));
        match (start, end) {
            (None, None) => Movement::None,
            (Some(start), None) => Movement::Hire { start },
            (None, Some(end)) => Movement::Termination { end },
            (Some(start), Some(end)) => Movement::HireAndTermination { start, end },
        }
    }

    /// Export code: 0 none, 1 hire, 2 termination, 3 both.
    pub fn code(&self) -> u8 {
        match self {
            Movement::None => 0,
            Movement::Hire { .. } => 1,
            Movement::Termination { .. } => 2,
            Movement::HireAndTermination { .. } => 3,
        }
    }

    /// Start date as `dd-mm-YYYY`, or an empty string.
    pub fn start_text(&self) -> String {
        match self {
            Movement::Hire { start } | Movement::HireAndTermination { start, .. } => {
                start.format(MOVEMENT_DATE_FORMAT).to_string()
            }
            _ => String::new(),
        }
    }

    /// End date as `dd-mm-YYYY`, or an empty string.
    pub fn end_text(&self) -> String {
        match self {
            Movement::Termination { end } | Movement::HireAndTermination { end, .. } => {
                end.format(MOVEMENT_DATE_FORMAT).to_string()
            }
            _ => String::new(),
        }
    }
}
