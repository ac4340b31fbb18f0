//! Health discount.
//!
//! Everyone pays at least the legal 7% of the capped base. Employees in an
//! Isapre may have negotiated a plan priced in UF or as a percentage; the
//! plan only raises the discount above the legal floor.

use rust_decimal::Decimal;

use super::money::round_peso;
use super::pension::pension_base;
use crate::config::RegulatoryParameters;
use crate::models::{
    AuditStep, AuditWarning, DiscountConcept, DiscountItem, EmployeeSnapshot, HealthPlan,
    HealthScheme,
};

/// Legal minimum health rate.
pub const HEALTH_LEGAL_RATE: Decimal = Decimal::from_parts(7, 0, 0, false, 2);

/// The result of the health calculation.
#[derive(Debug, Clone)]
pub struct HealthResult {
    /// Taxable earnings capped at the pension cap.
    pub base: Decimal,
    /// Legal 7% minimum, rounded.
    pub legal_amount: Decimal,
    /// Negotiated plan price, rounded, when one applies.
    pub negotiated_amount: Option<Decimal>,
    /// Discount amount: the larger of the legal and negotiated amounts.
    pub amount: Decimal,
    /// The discount line, present when the amount is positive.
    pub discount: Option<DiscountItem>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Warnings raised along the way.
    pub warnings: Vec<AuditWarning>,
}

/// Calculates the health discount.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::HEALTH_LEGAL_RATE;
/// use rust_decimal::Decimal;
///
/// assert_eq!(Decimal::from(1_000_000) * HEALTH_LEGAL_RATE, Decimal::from(70_000));
/// ```
pub fn calculate_health(
    employee: &EmployeeSnapshot,
    taxable_earnings: Decimal,
    params: &RegulatoryParameters,
    step_number: u32,
) -> HealthResult {
    let base = round_peso(pension_base(taxable_earnings, params));
    let legal_amount = round_peso(base * HEALTH_LEGAL_RATE);
    let mut warnings = Vec::new();

    let negotiated_amount = match (employee.health_scheme, employee.health_plan) {
        (Some(HealthScheme::Isapre), HealthPlan::Uf { amount }) => {
            Some(round_peso(amount * params.uf))
        }
        (Some(HealthScheme::Isapre), HealthPlan::Percentage { rate }) => {
            Some(round_peso(base * rate / Decimal::ONE_HUNDRED))
        }
        _ => None,
    };

    if employee.health_scheme.is_none() {
        warnings.push(AuditWarning {
            code: "HEALTH_SCHEME_MISSING".to_string(),
            message: "No health scheme on record; legal minimum applied".to_string(),
            severity: "medium".to_string(),
        });
    }

    let amount = negotiated_amount.map_or(legal_amount, |n| n.max(legal_amount));

    let name = match (employee.health_scheme, employee.isapre.as_deref()) {
        (Some(HealthScheme::Isapre), Some(isapre)) if !isapre.trim().is_empty() => {
            format!("Salud Isapre {}", isapre.trim())
        }
        (Some(HealthScheme::Isapre), _) => "Salud Isapre".to_string(),
        _ => "Salud Fonasa".to_string(),
    };
    let discount =
        (amount > Decimal::ZERO).then(|| DiscountItem::new(DiscountConcept::Health, name, amount));

    let reasoning = match negotiated_amount {
        Some(negotiated) if negotiated > legal_amount => format!(
            "Negotiated plan ${} exceeds legal 7% of ${} (${})",
            negotiated, base, legal_amount
        ),
        Some(negotiated) => format!(
            "Legal 7% of ${} (${}) is at least the negotiated plan ${}",
            base, legal_amount, negotiated
        ),
        None => format!("Legal 7% of ${} = ${}", base, legal_amount),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "health".to_string(),
        rule_name: "Health Contribution".to_string(),
        legal_ref: "Ley 18.469 art. 8".to_string(),
        input: serde_json::json!({
            "scheme": employee.health_scheme,
            "plan": employee.health_plan,
            "taxable_earnings": taxable_earnings.to_string()
        }),
        output: serde_json::json!({
            "base": base.to_string(),
            "legal_amount": legal_amount.to_string(),
            "negotiated_amount": negotiated_amount.map(|n| n.to_string()),
            "amount": amount.to_string()
        }),
        reasoning,
    };

    HealthResult {
        base,
        legal_amount,
        negotiated_amount,
        amount,
        discount,
        audit_step,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PayrollPeriod;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_params() -> RegulatoryParameters {
        RegulatoryParameters {
            period: PayrollPeriod::new(2025, 1).unwrap(),
            uf: dec("38000"),
            utm: dec("67429"),
            minimum_wage: dec("510000"),
            annual_gratification_cap: dec("2422500"),
            pension_cap_uf: dec("87.8"),
            unemployment_cap_uf: dec("131.8"),
            unemployment_employee_rate: dec("0.006"),
            pension_rates: BTreeMap::new(),
            tax_brackets: vec![],
            family_allowance_brackets: None,
        }
    }

    fn create_test_employee(scheme: Option<&str>, plan: serde_json::Value) -> EmployeeSnapshot {
        serde_json::from_value(serde_json::json!({
            "id": "emp_001",
            "national_id": "12345678-5",
            "first_names": "Ana",
            "paternal_surname": "Soto",
            "gender": "female",
            "base_salary": "1000000",
            "health_scheme": scheme,
            "isapre": "Colmena",
            "health_plan": plan
        }))
        .unwrap()
    }

    #[test]
    fn test_fonasa_pays_legal_minimum() {
        let employee = create_test_employee(Some("fonasa"), serde_json::json!({"type": "legal_minimum"}));
        let result = calculate_health(&employee, dec("1000000"), &create_test_params(), 10);
        assert_eq!(result.amount, dec("70000"));
        assert_eq!(result.discount.unwrap().name, "Salud Fonasa");
    }

    #[test]
    fn test_fonasa_ignores_negotiated_plan() {
        let employee = create_test_employee(
            Some("fonasa"),
            serde_json::json!({"type": "uf", "amount": "5"}),
        );
        let result = calculate_health(&employee, dec("1000000"), &create_test_params(), 10);
        assert_eq!(result.amount, dec("70000"));
        assert!(result.negotiated_amount.is_none());
    }

    #[test]
    fn test_isapre_uf_plan_above_legal_minimum() {
        // 3 UF × 38,000 = 114,000 > 70,000
        let employee = create_test_employee(
            Some("isapre"),
            serde_json::json!({"type": "uf", "amount": "3"}),
        );
        let result = calculate_health(&employee, dec("1000000"), &create_test_params(), 10);
        assert_eq!(result.amount, dec("114000"));
        assert_eq!(result.legal_amount, dec("70000"));
        assert_eq!(result.discount.unwrap().name, "Salud Isapre Colmena");
    }

    #[test]
    fn test_isapre_plan_below_legal_minimum_never_lowers_discount() {
        let employee = create_test_employee(
            Some("isapre"),
            serde_json::json!({"type": "uf", "amount": "1"}),
        );
        let result = calculate_health(&employee, dec("1000000"), &create_test_params(), 10);
        assert_eq!(result.amount, dec("70000"));
    }

    #[test]
    fn test_isapre_percentage_plan() {
        let employee = create_test_employee(
            Some("isapre"),
            serde_json::json!({"type": "percentage", "rate": "8.5"}),
        );
        let result = calculate_health(&employee, dec("1000000"), &create_test_params(), 10);
        assert_eq!(result.amount, dec("85000"));
    }

    #[test]
    fn test_base_is_capped() {
        let employee = create_test_employee(Some("fonasa"), serde_json::json!({"type": "legal_minimum"}));
        let result = calculate_health(&employee, dec("5000000"), &create_test_params(), 10);
        assert_eq!(result.base, dec("3336400"));
        assert_eq!(result.amount, dec("233548"));
    }

    #[test]
    fn test_missing_scheme_warns_and_applies_legal_minimum() {
        let employee = create_test_employee(None, serde_json::json!({"type": "legal_minimum"}));
        let result = calculate_health(&employee, dec("1000000"), &create_test_params(), 10);
        assert_eq!(result.amount, dec("70000"));
        assert_eq!(result.warnings[0].code, "HEALTH_SCHEME_MISSING");
    }
}
