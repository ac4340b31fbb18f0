//! Payroll period and per-period overrides.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EngineError, EngineResult};

use super::employee::Bonus;

#[derive(Deserialize)]
struct PeriodParts {
    year: i32,
    month: u32,
}

/// A calendar month being processed.
///
/// Construction validates the month, so the first and last day are always
/// available.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayrollPeriod::new(2024, 2).unwrap();
/// assert_eq!(period.days_in_month(), 29);
/// assert_eq!(period.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert_eq!(period.to_string(), "2024-02");
/// assert!(PayrollPeriod::new(2024, 13).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PeriodParts")]
pub struct PayrollPeriod {
    year: i32,
    month: u32,
    #[serde(skip_serializing)]
    first_day: NaiveDate,
    #[serde(skip_serializing)]
    last_day: NaiveDate,
}

impl TryFrom<PeriodParts> for PayrollPeriod {
    type Error = EngineError;

    fn try_from(parts: PeriodParts) -> EngineResult<Self> {
        PayrollPeriod::new(parts.year, parts.month)
    }
}

impl PayrollPeriod {
    /// Creates a period for the given year and month (1-12).
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidPeriod { year, month };
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last_day = next_month
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;

        Ok(Self {
            year,
            month,
            first_day,
            last_day,
        })
    }

    /// The period's year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The period's month (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Number of calendar days in the month.
    pub fn days_in_month(&self) -> u32 {
        self.last_day.day()
    }

    /// Checks if a date falls inside the month (inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }
}

impl fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Adjustments for one employee in one period, supplied by payroll drafting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodOverrides {
    /// Explicit worked days; takes precedence over the contract window.
    pub worked_days: Option<u32>,
    /// Days of absence subtracted from the contract window.
    pub absence_days: u32,
    /// Overtime hours paid with a 50% surcharge.
    pub overtime_hours_50: Decimal,
    /// Overtime hours paid with a 100% surcharge.
    pub overtime_hours_100: Decimal,
    /// Ad-hoc bonuses for this period, paid at face value.
    pub bonuses: Vec<Bonus>,
    /// Cash advances already paid, discounted after tax.
    pub cash_advances: Decimal,
}
