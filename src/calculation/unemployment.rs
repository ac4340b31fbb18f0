//! Unemployment insurance (AFC), employee side.

use rust_decimal::Decimal;

use super::money::round_peso;
use crate::config::RegulatoryParameters;
use crate::models::{AuditStep, DiscountConcept, DiscountItem, EmployeeSnapshot};

/// Label of the unemployment insurance line.
pub const UNEMPLOYMENT_LABEL: &str = "Seguro de cesantía";

/// The result of the unemployment insurance calculation.
#[derive(Debug, Clone)]
pub struct UnemploymentResult {
    /// Taxable earnings capped at the unemployment cap; zero when the
    /// employee is not insured.
    pub base: Decimal,
    /// Employee-side rate applied.
    pub rate: Decimal,
    /// Discount amount, rounded.
    pub amount: Decimal,
    /// The discount line, present when the amount is positive.
    pub discount: Option<DiscountItem>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employee-side unemployment insurance discount.
///
/// Only open-ended contracts carry an employee rate; fixed-term,
/// per-project and apprentice contracts pay nothing on the employee side.
pub fn calculate_unemployment(
    employee: &EmployeeSnapshot,
    taxable_earnings: Decimal,
    params: &RegulatoryParameters,
    step_number: u32,
) -> UnemploymentResult {
    let base = if employee.unemployment_insurance {
        round_peso(taxable_earnings.min(params.unemployment_cap_amount()))
    } else {
        Decimal::ZERO
    };

    let rate = if employee.contract_type.has_employee_unemployment_rate() {
        params.unemployment_employee_rate
    } else {
        Decimal::ZERO
    };

    let amount = round_peso(base * rate);
    let discount = (amount > Decimal::ZERO)
        .then(|| DiscountItem::new(DiscountConcept::Unemployment, UNEMPLOYMENT_LABEL, amount));

    let reasoning = if !employee.unemployment_insurance {
        "Employee not insured - no unemployment discount".to_string()
    } else if rate.is_zero() {
        format!(
            "{:?} contract carries no employee-side rate",
            employee.contract_type
        )
    } else {
        format!("${} × {} = ${}", base, rate.normalize(), amount)
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "unemployment_insurance".to_string(),
        rule_name: "Unemployment Insurance".to_string(),
        legal_ref: "Ley 19.728 art. 5".to_string(),
        input: serde_json::json!({
            "insured": employee.unemployment_insurance,
            "contract_type": employee.contract_type,
            "taxable_earnings": taxable_earnings.to_string(),
            "cap_uf": params.unemployment_cap_uf.normalize().to_string()
        }),
        output: serde_json::json!({
            "base": base.to_string(),
            "rate": rate.normalize().to_string(),
            "amount": amount.to_string()
        }),
        reasoning,
    };

    UnemploymentResult {
        base,
        rate,
        amount,
        discount,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContractType, PayrollPeriod};
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

    fn create_test_employee(contract_type: ContractType, insured: bool) -> EmployeeSnapshot {
        let mut employee: EmployeeSnapshot = serde_json::from_value(serde_json::json!({
            "id": "emp_001",
            "national_id": "12345678-5",
            "first_names": "Ana",
            "paternal_surname": "Soto",
            "gender": "female",
            "base_salary": "1000000"
        }))
        .unwrap();
        employee.contract_type = contract_type;
        employee.unemployment_insurance = insured;
        employee
    }

    #[test]
    fn test_indefinite_contract_pays_employee_rate() {
        let result = calculate_unemployment(
            &create_test_employee(ContractType::Indefinite, true),
            dec("1000000"),
            &create_test_params(),
            11,
        );
        assert_eq!(result.amount, dec("6000"));
        assert_eq!(result.discount.unwrap().name, "Seguro de cesantía");
    }

    #[test]
    fn test_other_contracts_pay_nothing() {
        for contract_type in [
            ContractType::FixedTerm,
            ContractType::PerProject,
            ContractType::Apprentice,
        ] {
            let result = calculate_unemployment(
                &create_test_employee(contract_type, true),
                dec("1000000"),
                &create_test_params(),
                11,
            );
            assert_eq!(result.amount, Decimal::ZERO);
            assert_eq!(result.base, dec("1000000"));
            assert!(result.discount.is_none());
        }
    }

    #[test]
    fn test_uninsured_employee_has_zero_base() {
        let result = calculate_unemployment(
            &create_test_employee(ContractType::Indefinite, false),
            dec("1000000"),
            &create_test_params(),
            11,
        );
        assert_eq!(result.base, Decimal::ZERO);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_base_is_capped() {
        // Cap: 131.8 × 38,000 = 5,008,400
        let result = calculate_unemployment(
            &create_test_employee(ContractType::Indefinite, true),
            dec("6000000"),
            &create_test_params(),
            11,
        );
        assert_eq!(result.base, dec("5008400"));
        assert_eq!(result.amount, dec("30050"));
    }
}
