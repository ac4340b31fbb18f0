//! Mandatory pension discount.

use rust_decimal::Decimal;

use super::money::round_peso;
use crate::config::RegulatoryParameters;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditWarning, DiscountConcept, DiscountItem, EmployeeSnapshot, PensionRegime,
};

/// The result of the pension calculation.
#[derive(Debug, Clone)]
pub struct PensionResult {
    /// Taxable earnings capped at the pension cap.
    pub base: Decimal,
    /// Mandatory rate applied, zero when no fund is charged.
    pub rate: Decimal,
    /// Discount amount, rounded.
    pub amount: Decimal,
    /// The discount line, present when the amount is positive.
    pub discount: Option<DiscountItem>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Warnings raised along the way.
    pub warnings: Vec<AuditWarning>,
}

/// Capped base shared by the pension and health discounts.
pub fn pension_base(taxable_earnings: Decimal, params: &RegulatoryParameters) -> Decimal {
    taxable_earnings.min(params.pension_cap_amount())
}

/// Calculates the mandatory pension discount.
///
/// Only employees in the AFP regime with a named fund are charged. The
/// fund's rate must be published for the period.
///
/// # Errors
///
/// Returns `ParametersNotFound` when the employee's fund has no rate for
/// the period.
pub fn calculate_pension(
    employee: &EmployeeSnapshot,
    taxable_earnings: Decimal,
    params: &RegulatoryParameters,
    step_number: u32,
) -> EngineResult<PensionResult> {
    let base = round_peso(pension_base(taxable_earnings, params));
    let mut warnings = Vec::new();

    let fund = employee
        .pension_fund
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());

    let (fund, rate) = match (employee.pension_regime, fund) {
        (Some(PensionRegime::Afp), Some(fund)) => (Some(fund), params.pension_rate(fund)?),
        (Some(PensionRegime::Afp), None) => {
            warnings.push(AuditWarning {
                code: "PENSION_FUND_MISSING".to_string(),
                message: "Employee is in the AFP regime but has no pension fund".to_string(),
                severity: "high".to_string(),
            });
            (None, Decimal::ZERO)
        }
        _ => (None, Decimal::ZERO),
    };

    let amount = round_peso(base * rate);
    let discount = match fund {
        Some(fund) if amount > Decimal::ZERO => Some(DiscountItem::new(
            DiscountConcept::Pension,
            format!("AFP {}", fund),
            amount,
        )),
        _ => None,
    };

    let reasoning = match fund {
        Some(fund) => format!(
            "min(${}, cap ${}) × {} ({}) = ${}",
            taxable_earnings,
            round_peso(params.pension_cap_amount()),
            rate.normalize(),
            fund,
            amount
        ),
        None => "No pension fund charged".to_string(),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "pension".to_string(),
        rule_name: "Mandatory Pension".to_string(),
        legal_ref: "DL 3500 art. 17".to_string(),
        input: serde_json::json!({
            "regime": employee.pension_regime,
            "fund": fund,
            "taxable_earnings": taxable_earnings.to_string(),
            "cap_uf": params.pension_cap_uf.normalize().to_string(),
            "uf": params.uf.normalize().to_string()
        }),
        output: serde_json::json!({
            "base": base.to_string(),
            "rate": rate.normalize().to_string(),
            "amount": amount.to_string()
        }),
        reasoning,
    };

    Ok(PensionResult {
        base,
        rate,
        amount,
        discount,
        audit_step,
        warnings,
    })
}
