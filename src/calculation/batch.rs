//! Roster computation.
//!
//! A roster is computed against one resolved parameter snapshot. Employees
//! are independent, so they are computed in parallel; a failure is recorded
//! next to the employee it belongs to and never stops its siblings.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::engine::compute;
use crate::config::RegulatoryParameters;
use crate::error::EngineError;
use crate::models::{EmployeeSnapshot, PayrollPeriod, PayrollResult, PeriodOverrides};

/// One employee and the adjustments drafted for the period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollInput {
    /// The employee master data.
    pub employee: EmployeeSnapshot,
    /// Adjustments for the period.
    #[serde(default)]
    pub overrides: PeriodOverrides,
}

/// An employee that could not be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// The employee that failed.
    pub employee_id: String,
    /// Why it failed.
    pub error: EngineError,
}

/// Results of a roster computation, in roster order.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Settlements computed successfully.
    pub results: Vec<PayrollResult>,
    /// Employees that failed, with the reason.
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    /// Total number of employees processed.
    pub fn len(&self) -> usize {
        self.results.len() + self.failures.len()
    }

    /// Returns true when the roster was empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Computes every employee in a roster for one period.
///
/// # Examples
///
/// ```no_run
/// use payroll_engine::calculation::compute_batch;
/// use payroll_engine::config::{ConfigLoader, resolve_period};
/// use payroll_engine::models::PayrollPeriod;
///
/// let loader = ConfigLoader::load("./config/cl")?;
/// let period = PayrollPeriod::new(2025, 1)?;
/// let params = resolve_period(&loader, period)?;
///
/// let outcome = compute_batch(&[], &period, &params);
/// assert!(outcome.is_empty());
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
pub fn compute_batch(
    inputs: &[PayrollInput],
    period: &PayrollPeriod,
    params: &RegulatoryParameters,
) -> BatchOutcome {
    let computed: Vec<Result<PayrollResult, BatchFailure>> = inputs
        .par_iter()
        .map(|input| {
            compute(&input.employee, period, &input.overrides, params).map_err(|error| {
                BatchFailure {
                    employee_id: input.employee.id.clone(),
                    error,
                }
            })
        })
        .collect();

    let outcome = computed
        .into_iter()
        .fold(BatchOutcome::default(), |mut outcome, entry| {
            match entry {
                Ok(result) => outcome.results.push(result),
                Err(failure) => {
                    tracing::warn!(
                        employee_id = %failure.employee_id,
                        error = %failure.error,
                        "Employee excluded from payroll run"
                    );
                    outcome.failures.push(failure);
                }
            }
            outcome
        });

    tracing::info!(
        period = %period,
        computed = outcome.results.len(),
        failed = outcome.failures.len(),
        "Payroll batch complete"
    );

    outcome
}
