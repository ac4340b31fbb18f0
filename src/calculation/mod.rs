//! Calculation logic for the payroll engine.
//!
//! Each rule lives in its own module and returns its result together with
//! the audit step that explains it. [`compute`] runs the rules in order for
//! one employee; [`compute_batch`] runs a whole roster in parallel.
//!
//! Every line item is rounded to the whole peso with [`round_peso`] before
//! it is stored, and every aggregate is a sum of rounded items.

mod allowances;
mod base_salary;
mod batch;
mod bonuses;
mod engine;
mod family_allowance;
mod gratification;
mod health;
mod income_tax;
mod limits;
mod money;
mod overtime;
mod pension;
mod unemployment;
mod voluntary_savings;
mod worked_days;

pub use allowances::{AllowancesResult, calculate_allowances};
pub use base_salary::{BASE_SALARY_LABEL, BaseSalaryResult, calculate_base_salary};
pub use batch::{BatchFailure, BatchOutcome, PayrollInput, compute_batch};
pub use bonuses::{BonusesResult, calculate_bonuses};
pub use engine::{CASH_ADVANCE_LABEL, ENGINE_VERSION, calculate_totals, compute};
pub use family_allowance::{
    FAMILY_ALLOWANCE_LABEL, FamilyAllowanceResult, calculate_family_allowance,
};
pub use gratification::{
    GRATIFICATION_LABEL, GRATIFICATION_RATE, GratificationResult, calculate_gratification,
};
pub use health::{HEALTH_LEGAL_RATE, HealthResult, calculate_health};
pub use income_tax::{
    INCOME_TAX_LABEL, IncomeTaxResult, TaxTable, TaxTableRow, calculate_income_tax,
    progressive_tax,
};
pub use limits::{
    MAX_AMOUNT, MAX_MONTHLY_HOURS, MAX_PLAN_RATE, MAX_PLAN_UF, MAX_WEEKLY_HOURS, check_limits,
};
pub use money::round_peso;
pub use overtime::{
    OVERTIME_50_MULTIPLIER, OVERTIME_100_MULTIPLIER, OvertimeResult, REFERENCE_WEEKLY_HOURS,
    calculate_overtime, overtime_hourly_rate,
};
pub use pension::{PensionResult, calculate_pension, pension_base};
pub use unemployment::{UNEMPLOYMENT_LABEL, UnemploymentResult, calculate_unemployment};
pub use voluntary_savings::{VoluntarySavingsResult, calculate_voluntary_savings};
pub use worked_days::{MONTH_UNITS, WorkedDaysResult, calculate_worked_days, contract_window_units};
