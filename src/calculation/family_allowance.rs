//! State family allowance (asignación familiar).
//!
//! Paid per dependent to enrolled employees. The bracket is chosen by the
//! employee's taxable earnings for the month, not by the declared bracket
//! on the master record; a mismatch is only flagged.

use rust_decimal::Decimal;

use super::money::round_peso;
use crate::config::RegulatoryParameters;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, EarningConcept, EarningItem, EmployeeSnapshot};

/// Label of the family allowance line.
pub const FAMILY_ALLOWANCE_LABEL: &str = "Asignación familiar";

/// The result of the family allowance calculation.
#[derive(Debug, Clone)]
pub struct FamilyAllowanceResult {
    /// Bracket applied, if any.
    pub bracket: Option<String>,
    /// Allowance amount, rounded.
    pub amount: Decimal,
    /// The earning line, present when the amount is positive.
    pub earning: Option<EarningItem>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Warnings raised along the way.
    pub warnings: Vec<AuditWarning>,
}

/// Calculates the family allowance.
///
/// # Errors
///
/// Returns `ParametersNotFound` when the employee is eligible but the
/// period has no family-allowance table.
pub fn calculate_family_allowance(
    employee: &EmployeeSnapshot,
    taxable_earnings: Decimal,
    params: &RegulatoryParameters,
    step_number: u32,
) -> EngineResult<FamilyAllowanceResult> {
    let eligible = employee.family_allowance_enrolled && employee.dependents > 0;

    if !eligible {
        let audit_step = AuditStep {
            step_number,
            rule_id: "family_allowance".to_string(),
            rule_name: "Family Allowance".to_string(),
            legal_ref: "DFL 150 de 1981".to_string(),
            input: serde_json::json!({
                "enrolled": employee.family_allowance_enrolled,
                "dependents": employee.dependents
            }),
            output: serde_json::json!({
                "eligible": false,
                "amount": "0"
            }),
            reasoning: "Not enrolled or no dependents - no family allowance".to_string(),
        };
        return Ok(FamilyAllowanceResult {
            bracket: None,
            amount: Decimal::ZERO,
            earning: None,
            audit_step,
            warnings: Vec::new(),
        });
    }

    let brackets = params.family_allowance_brackets.as_deref().ok_or_else(|| {
        EngineError::ParametersNotFound {
            parameter: "family_allowance_brackets".to_string(),
            period: params.period.to_string(),
        }
    })?;

    let mut warnings = Vec::new();
    let matched = brackets.iter().find(|b| b.contains(taxable_earnings));

    let (bracket, amount) = match matched {
        Some(b) => (
            Some(b.bracket.clone()),
            round_peso(b.amount * Decimal::from(employee.dependents)),
        ),
        None => {
            warnings.push(AuditWarning {
                code: "FAMILY_ALLOWANCE_NO_BRACKET".to_string(),
                message: format!(
                    "No family-allowance bracket contains taxable earnings of ${}",
                    taxable_earnings
                ),
                severity: "low".to_string(),
            });
            (None, Decimal::ZERO)
        }
    };

    if let (Some(declared), Some(applied)) = (&employee.family_allowance_bracket, &bracket) {
        if !declared.trim().eq_ignore_ascii_case(applied) {
            warnings.push(AuditWarning {
                code: "FAMILY_ALLOWANCE_BRACKET_MISMATCH".to_string(),
                message: format!(
                    "Declared bracket {} differs from bracket {} for this month's earnings",
                    declared.trim(),
                    applied
                ),
                severity: "medium".to_string(),
            });
        }
    }

    let earning = (amount > Decimal::ZERO).then(|| {
        EarningItem::non_taxable(EarningConcept::FamilyAllowance, FAMILY_ALLOWANCE_LABEL, amount)
    });

    let audit_step = AuditStep {
        step_number,
        rule_id: "family_allowance".to_string(),
        rule_name: "Family Allowance".to_string(),
        legal_ref: "DFL 150 de 1981".to_string(),
        input: serde_json::json!({
            "enrolled": true,
            "dependents": employee.dependents,
            "taxable_earnings": taxable_earnings.to_string()
        }),
        output: serde_json::json!({
            "eligible": true,
            "bracket": bracket,
            "amount": amount.to_string()
        }),
        reasoning: match &bracket {
            Some(b) => format!(
                "Bracket {} × {} dependents = ${}",
                b, employee.dependents, amount
            ),
            None => "No bracket matches taxable earnings - no allowance".to_string(),
        },
    };

    Ok(FamilyAllowanceResult {
        bracket,
        amount,
        earning,
        audit_step,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FamilyAllowanceBracket;
    use crate::models::PayrollPeriod;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bracket(name: &str, from: &str, to: Option<&str>, amount: &str) -> FamilyAllowanceBracket {
        FamilyAllowanceBracket {
            bracket: name.to_string(),
            from: dec(from),
            to: to.map(dec),
            amount: dec(amount),
        }
    }

    fn create_test_params(brackets: Option<Vec<FamilyAllowanceBracket>>) -> RegulatoryParameters {
        RegulatoryParameters {
            period: PayrollPeriod::new(2025, 1).unwrap(),
            uf: dec("38384.41"),
            utm: dec("67429"),
            minimum_wage: dec("510000"),
            annual_gratification_cap: dec("2422500"),
            pension_cap_uf: dec("87.8"),
            unemployment_cap_uf: dec("131.8"),
            unemployment_employee_rate: dec("0.006"),
            pension_rates: BTreeMap::new(),
            tax_brackets: vec![],
            family_allowance_brackets: brackets,
        }
    }

    fn table() -> Vec<FamilyAllowanceBracket> {
        vec![
            bracket("A", "0", Some("586227"), "21243"),
            bracket("B", "586227", Some("856247"), "13036"),
            bracket("C", "856247", Some("1335450"), "4119"),
            bracket("D", "1335450", None, "0"),
        ]
    }

    fn create_test_employee(enrolled: bool, dependents: u32) -> EmployeeSnapshot {
        serde_json::from_value(serde_json::json!({
            "id": "emp_001",
            "national_id": "12345678-5",
            "first_names": "Ana",
            "paternal_surname": "Soto",
            "gender": "female",
            "base_salary": "500000",
            "family_allowance_enrolled": enrolled,
            "dependents": dependents
        }))
        .unwrap()
    }

    #[test]
    fn test_not_enrolled_pays_nothing_without_table() {
        let result = calculate_family_allowance(
            &create_test_employee(false, 2),
            dec("500000"),
            &create_test_params(None),
            7,
        )
        .unwrap();
        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.earning.is_none());
    }

    #[test]
    fn test_no_dependents_pays_nothing() {
        let result = calculate_family_allowance(
            &create_test_employee(true, 0),
            dec("500000"),
            &create_test_params(Some(table())),
            7,
        )
        .unwrap();
        assert!(result.bracket.is_none());
    }

    #[test]
    fn test_bracket_a_times_dependents() {
        let result = calculate_family_allowance(
            &create_test_employee(true, 2),
            dec("500000"),
            &create_test_params(Some(table())),
            7,
        )
        .unwrap();
        assert_eq!(result.bracket.as_deref(), Some("A"));
        assert_eq!(result.amount, dec("42486"));
        assert_eq!(result.earning.unwrap().name, "Asignación familiar");
    }

    #[test]
    fn test_upper_bound_is_exclusive() {
        let result = calculate_family_allowance(
            &create_test_employee(true, 1),
            dec("586227"),
            &create_test_params(Some(table())),
            7,
        )
        .unwrap();
        assert_eq!(result.bracket.as_deref(), Some("B"));
        assert_eq!(result.amount, dec("13036"));
    }

    #[test]
    fn test_top_bracket_pays_zero() {
        let result = calculate_family_allowance(
            &create_test_employee(true, 3),
            dec("2000000"),
            &create_test_params(Some(table())),
            7,
        )
        .unwrap();
        assert_eq!(result.bracket.as_deref(), Some("D"));
        assert!(result.earning.is_none());
    }

    #[test]
    fn test_gap_in_table_is_a_warning_not_an_error() {
        let result = calculate_family_allowance(
            &create_test_employee(true, 1),
            dec("2000000"),
            &create_test_params(Some(vec![bracket("A", "0", Some("586227"), "21243")])),
            7,
        )
        .unwrap();
        assert_eq!(result.amount, Decimal::ZERO);
        assert_eq!(result.warnings[0].code, "FAMILY_ALLOWANCE_NO_BRACKET");
    }

    #[test]
    fn test_declared_bracket_mismatch_is_flagged() {
        let mut employee = create_test_employee(true, 1);
        employee.family_allowance_bracket = Some("C".to_string());
        let result = calculate_family_allowance(
            &employee,
            dec("500000"),
            &create_test_params(Some(table())),
            7,
        )
        .unwrap();
        assert_eq!(result.bracket.as_deref(), Some("A"));
        assert_eq!(result.warnings[0].code, "FAMILY_ALLOWANCE_BRACKET_MISMATCH");
    }

    #[test]
    fn test_missing_table_for_eligible_employee_is_configuration_error() {
        let err = calculate_family_allowance(
            &create_test_employee(true, 1),
            dec("500000"),
            &create_test_params(None),
            7,
        )
        .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("family_allowance_brackets"));
    }
}
