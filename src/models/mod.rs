//! Core data models for the payroll engine.
//!
//! This module contains the employee snapshot, the payroll period and its
//! overrides, and the computed payroll result.

mod dates;
mod employee;
mod payroll_result;
mod period;

pub use dates::{flexible_date, flexible_date_opt, parse_date_text};
pub use employee::{
    Bonus, ContractType, EmployeeSnapshot, Gender, GratificationPolicy, HealthPlan, HealthScheme,
    Nationality, PensionRegime, SavingsRegime, VoluntarySavings, WorkdayType,
};
pub use payroll_result::{
    AuditStep, AuditTrace, AuditWarning, DiscountConcept, DiscountItem, DiscountKind,
    EarningConcept, EarningItem, EarningKind, PayrollResult, PayrollTotals, TaxableBases,
};
pub use period::{PayrollPeriod, PeriodOverrides};
