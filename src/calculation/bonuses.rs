//! Bonus calculation.
//!
//! Period bonuses are paid at face value; recurring fixed bonuses follow
//! the contract and are prorated by the proportional factor. Each bonus
//! keeps its own taxable tag.

use rust_decimal::Decimal;

use super::money::round_peso;
use crate::models::{AuditStep, Bonus, EarningConcept, EarningItem, EarningKind};

/// The result of the bonus calculation.
#[derive(Debug, Clone)]
pub struct BonusesResult {
    /// One earning line per bonus with a positive amount.
    pub earnings: Vec<EarningItem>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn bonus_line(concept: EarningConcept, bonus: &Bonus, amount: Decimal) -> EarningItem {
    if bonus.taxable {
        EarningItem::taxable(concept, bonus.name.clone(), amount)
    } else {
        EarningItem::non_taxable(concept, bonus.name.clone(), amount)
    }
}

/// Calculates period and recurring bonuses.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_bonuses;
/// use payroll_engine::models::Bonus;
/// use rust_decimal::Decimal;
///
/// let fixed = vec![Bonus { name: "Bono responsabilidad".to_string(), amount: Decimal::from(60000), taxable: true }];
/// let result = calculate_bonuses(&[], &fixed, Decimal::new(5, 1), 5);
/// assert_eq!(result.earnings[0].amount, Decimal::from(30000));
/// ```
pub fn calculate_bonuses(
    period_bonuses: &[Bonus],
    fixed_bonuses: &[Bonus],
    proportional_factor: Decimal,
    step_number: u32,
) -> BonusesResult {
    let period_lines = period_bonuses
        .iter()
        .map(|bonus| bonus_line(EarningConcept::Bonus, bonus, round_peso(bonus.amount)));
    let fixed_lines = fixed_bonuses.iter().map(|bonus| {
        bonus_line(
            EarningConcept::FixedBonus,
            bonus,
            round_peso(bonus.amount * proportional_factor),
        )
    });

    let earnings: Vec<EarningItem> = period_lines
        .chain(fixed_lines)
        .filter(|line| line.amount > Decimal::ZERO)
        .collect();

    let taxable: Decimal = earnings
        .iter()
        .filter(|e| e.kind == EarningKind::Taxable)
        .map(|e| e.amount)
        .sum();
    let non_taxable: Decimal = earnings
        .iter()
        .filter(|e| e.kind == EarningKind::NonTaxable)
        .map(|e| e.amount)
        .sum();

    let audit_step = AuditStep {
        step_number,
        rule_id: "bonuses".to_string(),
        rule_name: "Bonuses".to_string(),
        legal_ref: "Código del Trabajo art. 42".to_string(),
        input: serde_json::json!({
            "period_bonuses": period_bonuses.len(),
            "fixed_bonuses": fixed_bonuses.len(),
            "proportional_factor": proportional_factor.round_dp(6).normalize().to_string()
        }),
        output: serde_json::json!({
            "lines": earnings.len(),
            "taxable": taxable.to_string(),
            "non_taxable": non_taxable.to_string()
        }),
        reasoning: format!(
            "{} bonus lines: ${} taxable, ${} non-taxable",
            earnings.len(),
            taxable,
            non_taxable
        ),
    };

    BonusesResult {
        earnings,
        audit_step,
    }
}
