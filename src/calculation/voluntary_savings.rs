//! Voluntary pension savings (APV).
//!
//! Regime B savings are deducted before income tax and lower the tax base.
//! Regime A savings are deducted after tax.

use rust_decimal::Decimal;

use super::money::round_peso;
use crate::models::{
    AuditStep, DiscountConcept, DiscountItem, EmployeeSnapshot, SavingsRegime,
};

/// The result of the voluntary savings calculation.
#[derive(Debug, Clone)]
pub struct VoluntarySavingsResult {
    /// Regime elected, if any.
    pub regime: Option<SavingsRegime>,
    /// Amount deducted before tax.
    pub pre_tax_amount: Decimal,
    /// Amount deducted after tax.
    pub post_tax_amount: Decimal,
    /// The discount line, present when the amount is positive.
    pub discount: Option<DiscountItem>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the voluntary savings discount for the employee's election.
pub fn calculate_voluntary_savings(
    employee: &EmployeeSnapshot,
    step_number: u32,
) -> VoluntarySavingsResult {
    let election = employee.voluntary_savings;
    let regime = election.map(|s| s.regime);
    let amount = election.map_or(Decimal::ZERO, |s| round_peso(s.amount));

    let (pre_tax_amount, post_tax_amount, discount) = match regime {
        Some(SavingsRegime::PreTax) if amount > Decimal::ZERO => (
            amount,
            Decimal::ZERO,
            Some(DiscountItem::new(
                DiscountConcept::VoluntarySavingsPreTax,
                "APV régimen B",
                amount,
            )),
        ),
        Some(SavingsRegime::PostTax) if amount > Decimal::ZERO => (
            Decimal::ZERO,
            amount,
            Some(DiscountItem::new(
                DiscountConcept::VoluntarySavingsPostTax,
                "APV régimen A",
                amount,
            )),
        ),
        _ => (Decimal::ZERO, Decimal::ZERO, None),
    };

    let reasoning = match regime {
        Some(SavingsRegime::PreTax) => format!("${} deducted before tax (regime B)", amount),
        Some(SavingsRegime::PostTax) => format!("${} deducted after tax (regime A)", amount),
        None => "No voluntary savings election".to_string(),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "voluntary_savings".to_string(),
        rule_name: "Voluntary Pension Savings".to_string(),
        legal_ref: "DL 3500 art. 20 L".to_string(),
        input: serde_json::json!({
            "regime": regime,
            "amount": election.map(|s| s.amount.normalize().to_string())
        }),
        output: serde_json::json!({
            "pre_tax_amount": pre_tax_amount.to_string(),
            "post_tax_amount": post_tax_amount.to_string()
        }),
        reasoning,
    };

    VoluntarySavingsResult {
        regime,
        pre_tax_amount,
        post_tax_amount,
        discount,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VoluntarySavings;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee(savings: Option<VoluntarySavings>) -> EmployeeSnapshot {
        let mut employee: EmployeeSnapshot = serde_json::from_value(serde_json::json!({
            "id": "emp_001",
            "national_id": "12345678-5",
            "first_names": "Ana",
            "paternal_surname": "Soto",
            "gender": "female",
            "base_salary": "1000000"
        }))
        .unwrap();
        employee.voluntary_savings = savings;
        employee
    }

    #[test]
    fn test_pre_tax_savings() {
        let result = calculate_voluntary_savings(
            &create_test_employee(Some(VoluntarySavings {
                regime: SavingsRegime::PreTax,
                amount: dec("50000"),
            })),
            12,
        );
        assert_eq!(result.pre_tax_amount, dec("50000"));
        assert_eq!(result.post_tax_amount, Decimal::ZERO);
        let discount = result.discount.unwrap();
        assert_eq!(discount.concept, DiscountConcept::VoluntarySavingsPreTax);
        assert_eq!(discount.name, "APV régimen B");
    }

    #[test]
    fn test_post_tax_savings() {
        let result = calculate_voluntary_savings(
            &create_test_employee(Some(VoluntarySavings {
                regime: SavingsRegime::PostTax,
                amount: dec("30000.4"),
            })),
            12,
        );
        assert_eq!(result.pre_tax_amount, Decimal::ZERO);
        assert_eq!(result.post_tax_amount, dec("30000"));
    }

    #[test]
    fn test_no_election() {
        let result = calculate_voluntary_savings(&create_test_employee(None), 12);
        assert!(result.regime.is_none());
        assert!(result.discount.is_none());
    }
}
