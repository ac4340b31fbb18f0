//! Fixed non-taxable allowances (transport and meal).

use rust_decimal::Decimal;

use super::money::round_peso;
use crate::models::{AuditStep, EarningConcept, EarningItem, EmployeeSnapshot};

/// The result of prorating the fixed allowances.
#[derive(Debug, Clone)]
pub struct AllowancesResult {
    /// Prorated transport allowance.
    pub transport: Decimal,
    /// Prorated meal allowance.
    pub meal: Decimal,
    /// Non-taxable earning lines with a positive amount.
    pub earnings: Vec<EarningItem>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prorates transport and meal allowances by the proportional factor.
pub fn calculate_allowances(
    employee: &EmployeeSnapshot,
    proportional_factor: Decimal,
    step_number: u32,
) -> AllowancesResult {
    let transport = round_peso(employee.transport_allowance * proportional_factor);
    let meal = round_peso(employee.meal_allowance * proportional_factor);

    let earnings: Vec<EarningItem> = [
        (EarningConcept::Transport, "Movilización", transport),
        (EarningConcept::Meal, "Colación", meal),
    ]
    .into_iter()
    .filter(|(_, _, amount)| *amount > Decimal::ZERO)
    .map(|(concept, name, amount)| EarningItem::non_taxable(concept, name, amount))
    .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "allowances".to_string(),
        rule_name: "Transport and Meal Allowances".to_string(),
        legal_ref: "Código del Trabajo art. 41".to_string(),
        input: serde_json::json!({
            "transport_allowance": employee.transport_allowance.normalize().to_string(),
            "meal_allowance": employee.meal_allowance.normalize().to_string(),
            "proportional_factor": proportional_factor.round_dp(6).normalize().to_string()
        }),
        output: serde_json::json!({
            "transport": transport.to_string(),
            "meal": meal.to_string()
        }),
        reasoning: format!(
            "Non-taxable allowances prorated: transport ${}, meal ${}",
            transport, meal
        ),
    };

    AllowancesResult {
        transport,
        meal,
        earnings,
        audit_step,
    }
}
