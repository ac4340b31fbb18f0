//! Magnitude limits on employee input.
//!
//! `Decimal` arithmetic panics on overflow, and amounts and hours arrive
//! straight from request bodies. [`check_limits`] rejects any figure whose
//! magnitude no real settlement can reach, so every product the rules form
//! stays far inside the `Decimal` range.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeSnapshot, HealthPlan, PeriodOverrides};

/// Largest peso amount accepted on any input line (one trillion pesos).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Largest number of hours in a month (31 days of 24 hours).
pub const MAX_MONTHLY_HOURS: Decimal = Decimal::from_parts(744, 0, 0, false, 0);

/// Largest contracted workweek (7 days of 24 hours).
pub const MAX_WEEKLY_HOURS: Decimal = Decimal::from_parts(168, 0, 0, false, 0);

/// Largest Isapre plan price, in UF.
pub const MAX_PLAN_UF: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Largest negotiated health rate, in percentage points.
pub const MAX_PLAN_RATE: Decimal = Decimal::ONE_HUNDRED;

fn check(employee_id: &str, field: &str, value: Decimal, limit: Decimal) -> EngineResult<()> {
    if value.abs() > limit {
        return Err(EngineError::InvalidEmployee {
            employee_id: employee_id.to_string(),
            field: field.to_string(),
            message: format!("{} exceeds the limit of {}", value.normalize(), limit),
        });
    }
    Ok(())
}

/// Rejects an employee whose amounts or hours are out of range.
///
/// # Errors
///
/// Returns `InvalidEmployee` naming the first field that exceeds its limit.
pub fn check_limits(employee: &EmployeeSnapshot, overrides: &PeriodOverrides) -> EngineResult<()> {
    let id = employee.id.as_str();

    check(id, "base_salary", employee.base_salary, MAX_AMOUNT)?;
    check(id, "weekly_hours", employee.weekly_hours, MAX_WEEKLY_HOURS)?;
    check(id, "transport_allowance", employee.transport_allowance, MAX_AMOUNT)?;
    check(id, "meal_allowance", employee.meal_allowance, MAX_AMOUNT)?;
    for bonus in &employee.fixed_bonuses {
        check(id, "fixed_bonuses", bonus.amount, MAX_AMOUNT)?;
    }
    if let Some(savings) = &employee.voluntary_savings {
        check(id, "voluntary_savings", savings.amount, MAX_AMOUNT)?;
    }
    match employee.health_plan {
        HealthPlan::Uf { amount } => check(id, "health_plan", amount, MAX_PLAN_UF)?,
        HealthPlan::Percentage { rate } => check(id, "health_plan", rate, MAX_PLAN_RATE)?,
        HealthPlan::LegalMinimum => {}
    }

    check(id, "overtime_hours_50", overrides.overtime_hours_50, MAX_MONTHLY_HOURS)?;
    check(id, "overtime_hours_100", overrides.overtime_hours_100, MAX_MONTHLY_HOURS)?;
    for bonus in &overrides.bonuses {
        check(id, "bonuses", bonus.amount, MAX_AMOUNT)?;
    }
    check(id, "cash_advances", overrides.cash_advances, MAX_AMOUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bonus;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee(base_salary: &str) -> EmployeeSnapshot {
        serde_json::from_value(serde_json::json!({
            "id": "emp_001",
            "national_id": "12345678-5",
            "first_names": "Ana",
            "paternal_surname": "Soto",
            "gender": "female",
            "contract_start": "2020-01-01",
            "base_salary": base_salary
        }))
        .unwrap()
    }

    fn field_of(result: EngineResult<()>) -> String {
        match result {
            Err(EngineError::InvalidEmployee { field, .. }) => field,
            other => panic!("Expected InvalidEmployee, got {:?}", other),
        }
    }

    #[test]
    fn test_max_amount_is_one_trillion() {
        assert_eq!(MAX_AMOUNT, dec("1000000000000"));
    }

    #[test]
    fn test_ordinary_employee_passes() {
        let employee = create_test_employee("1000000");
        let overrides = PeriodOverrides {
            overtime_hours_50: dec("10"),
            cash_advances: dec("50000"),
            ..PeriodOverrides::default()
        };
        assert!(check_limits(&employee, &overrides).is_ok());
    }

    #[test]
    fn test_amount_at_the_limit_passes() {
        let employee = create_test_employee("1000000000000");
        assert!(check_limits(&employee, &PeriodOverrides::default()).is_ok());
    }

    #[test]
    fn test_huge_salary_is_rejected() {
        let employee = create_test_employee("1000000000001");
        let field = field_of(check_limits(&employee, &PeriodOverrides::default()));
        assert_eq!(field, "base_salary");
    }

    #[test]
    fn test_huge_overtime_hours_are_rejected() {
        let employee = create_test_employee("1000000000000");
        let overrides = PeriodOverrides {
            overtime_hours_50: dec("100000000000000000000"),
            ..PeriodOverrides::default()
        };
        assert_eq!(field_of(check_limits(&employee, &overrides)), "overtime_hours_50");
    }

    #[test]
    fn test_huge_negative_advance_is_rejected() {
        let employee = create_test_employee("1000000");
        let overrides = PeriodOverrides {
            cash_advances: dec("-50000000000000000000"),
            ..PeriodOverrides::default()
        };
        assert_eq!(field_of(check_limits(&employee, &overrides)), "cash_advances");
    }

    #[test]
    fn test_ad_hoc_bonus_is_checked() {
        let employee = create_test_employee("1000000");
        let overrides = PeriodOverrides {
            bonuses: vec![Bonus {
                name: "Producción".to_string(),
                amount: dec("9999999999999999"),
                taxable: true,
            }],
            ..PeriodOverrides::default()
        };
        assert_eq!(field_of(check_limits(&employee, &overrides)), "bonuses");
    }

    #[test]
    fn test_plan_rate_above_one_hundred_is_rejected() {
        let mut employee = create_test_employee("1000000");
        employee.health_plan = HealthPlan::Percentage { rate: dec("250") };
        let field = field_of(check_limits(&employee, &PeriodOverrides::default()));
        assert_eq!(field, "health_plan");
    }
}
