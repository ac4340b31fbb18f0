//! Worked-days calculation.
//!
//! Payroll months are measured on a normalized 30-unit scale: every month
//! pays 30 days regardless of its calendar length. This module intersects
//! the contract with the month, converts the result to units, applies
//! absences and overrides, and derives the proportional factor every
//! prorated amount is multiplied by.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, EmployeeSnapshot, PayrollPeriod, PeriodOverrides};

/// Payable units in every month.
pub const MONTH_UNITS: u32 = 30;

/// Months shorter than 30 days count as complete from this many real days.
const SHORT_MONTH_FULL_DAYS: u32 = 28;

/// The result of the worked-days calculation.
#[derive(Debug, Clone)]
pub struct WorkedDaysResult {
    /// Units covered by the contract within the month.
    pub window_units: u32,
    /// Payable days after absences or override, in `[0, 30]`.
    pub worked_days: u32,
    /// Absence days reported for the period.
    pub absence_days: u32,
    /// `worked_days / 30`, in `[0, 1]`.
    pub proportional_factor: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Warnings raised along the way.
    pub warnings: Vec<AuditWarning>,
}

/// Converts the part of a month covered by a contract into 30-scale units.
///
/// A contract covering the whole month is worth 30 units. A month shorter
/// than 30 days counts as complete once 28 or more of its real days are
/// covered. Otherwise the covered day numbers are mapped onto the 30-unit
/// scale, with the last day of the month standing for day 30.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::contract_window_units;
/// use payroll_engine::models::PayrollPeriod;
/// use chrono::NaiveDate;
///
/// let march = PayrollPeriod::new(2025, 3).unwrap();
/// let start = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
/// assert_eq!(contract_window_units(start, None, &march), 16);
///
/// let february = PayrollPeriod::new(2025, 2).unwrap();
/// let before = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// assert_eq!(contract_window_units(before, None, &february), 30);
/// ```
pub fn contract_window_units(
    contract_start: NaiveDate,
    contract_end: Option<NaiveDate>,
    period: &PayrollPeriod,
) -> u32 {
    let first = period.first_day();
    let last = period.last_day();

    let window_start = contract_start.max(first);
    let window_end = contract_end.map_or(last, |end| end.min(last));

    if window_end < window_start {
        return 0;
    }
    if window_start == first && window_end == last {
        return MONTH_UNITS;
    }

    let real_days = (window_end - window_start).num_days() as u32 + 1;
    if period.days_in_month() < MONTH_UNITS && real_days >= SHORT_MONTH_FULL_DAYS {
        return MONTH_UNITS;
    }

    let start_unit = window_start.day().min(MONTH_UNITS);
    let end_unit = if window_end == last {
        MONTH_UNITS
    } else {
        window_end.day().min(MONTH_UNITS)
    };

    (end_unit + 1).saturating_sub(start_unit).min(MONTH_UNITS)
}

/// Calculates payable days and the proportional factor for one employee.
///
/// `worked_days = window_units - absence_days` unless the overrides carry an
/// explicit worked-days figure, which takes precedence (clamped to 30).
///
/// # Errors
///
/// Returns `InvalidEmployee` when the employee has no contract start date.
pub fn calculate_worked_days(
    employee: &EmployeeSnapshot,
    period: &PayrollPeriod,
    overrides: &PeriodOverrides,
    step_number: u32,
) -> EngineResult<WorkedDaysResult> {
    let contract_start = employee
        .contract_start
        .ok_or_else(|| EngineError::InvalidEmployee {
            employee_id: employee.id.clone(),
            field: "contract_start".to_string(),
            message: "missing contract start date".to_string(),
        })?;

    let window_units = contract_window_units(contract_start, employee.contract_end, period);
    let absence_days = overrides.absence_days;
    let mut warnings = Vec::new();

    let (worked_days, source) = match overrides.worked_days {
        Some(days) => {
            if days > window_units {
                warnings.push(AuditWarning {
                    code: "WORKED_DAYS_OVERRIDE_EXCEEDS_CONTRACT".to_string(),
                    message: format!(
                        "Worked-days override {} exceeds the {} units covered by the contract",
                        days, window_units
                    ),
                    severity: "medium".to_string(),
                });
            }
            (days.min(MONTH_UNITS), "override")
        }
        None => {
            if absence_days > window_units {
                warnings.push(AuditWarning {
                    code: "ABSENCES_EXCEED_CONTRACT".to_string(),
                    message: format!(
                        "{} absence days exceed the {} units covered by the contract",
                        absence_days, window_units
                    ),
                    severity: "low".to_string(),
                });
            }
            (window_units.saturating_sub(absence_days), "contract_window")
        }
    };

    let proportional_factor = Decimal::from(worked_days) / Decimal::from(MONTH_UNITS);

    let audit_step = AuditStep {
        step_number,
        rule_id: "worked_days".to_string(),
        rule_name: "Worked Days".to_string(),
        legal_ref: "Código del Trabajo art. 55".to_string(),
        input: serde_json::json!({
            "contract_start": contract_start.to_string(),
            "contract_end": employee.contract_end.map(|d| d.to_string()),
            "period": period.to_string(),
            "absence_days": absence_days,
            "worked_days_override": overrides.worked_days
        }),
        output: serde_json::json!({
            "window_units": window_units,
            "worked_days": worked_days,
            "proportional_factor": proportional_factor.round_dp(6).normalize().to_string(),
            "source": source
        }),
        reasoning: format!(
            "Contract covers {} of {} units in {}; {} payable days ({})",
            window_units, MONTH_UNITS, period, worked_days, source
        ),
    };

    Ok(WorkedDaysResult {
        window_units,
        worked_days,
        absence_days,
        proportional_factor,
        audit_step,
        warnings,
    })
}
