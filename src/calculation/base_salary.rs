//! Proportional base salary calculation.

use rust_decimal::Decimal;

use super::money::round_peso;
use crate::models::{AuditStep, EarningConcept, EarningItem, EmployeeSnapshot};

/// Label of the base salary line.
pub const BASE_SALARY_LABEL: &str = "Sueldo base";

/// The result of prorating the base salary.
#[derive(Debug, Clone)]
pub struct BaseSalaryResult {
    /// Prorated base salary, rounded to the peso.
    pub amount: Decimal,
    /// The earning line, present when the amount is positive.
    pub earning: Option<EarningItem>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prorates the monthly base salary by the proportional factor.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_base_salary;
/// use payroll_engine::models::EmployeeSnapshot;
/// use rust_decimal::Decimal;
///
/// let employee: EmployeeSnapshot = serde_json::from_value(serde_json::json!({
///     "id": "emp_001",
///     "national_id": "12345678-5",
///     "first_names": "Ana",
///     "paternal_surname": "Soto",
///     "gender": "female",
///     "base_salary": "900000"
/// })).unwrap();
///
/// let result = calculate_base_salary(&employee, Decimal::new(5, 1), 2);
/// assert_eq!(result.amount, Decimal::from(450000));
/// assert!(result.earning.is_some());
/// ```
pub fn calculate_base_salary(
    employee: &EmployeeSnapshot,
    proportional_factor: Decimal,
    step_number: u32,
) -> BaseSalaryResult {
    let amount = round_peso(employee.base_salary * proportional_factor);

    let earning = (amount > Decimal::ZERO)
        .then(|| EarningItem::taxable(EarningConcept::BaseSalary, BASE_SALARY_LABEL, amount));

    let audit_step = AuditStep {
        step_number,
        rule_id: "base_salary".to_string(),
        rule_name: "Base Salary".to_string(),
        legal_ref: "Código del Trabajo art. 42(a)".to_string(),
        input: serde_json::json!({
            "base_salary": employee.base_salary.normalize().to_string(),
            "proportional_factor": proportional_factor.round_dp(6).normalize().to_string()
        }),
        output: serde_json::json!({
            "amount": amount.to_string()
        }),
        reasoning: format!(
            "${} × {} = ${}",
            employee.base_salary.normalize(),
            proportional_factor.round_dp(4).normalize(),
            amount
        ),
    };

    BaseSalaryResult {
        amount,
        earning,
        audit_step,
    }
}
