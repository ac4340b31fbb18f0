//! Legal gratification calculation.
//!
//! Gratification is paid monthly as 25% of the proportional base salary.
//! Under the capped policy the monthly amount never exceeds one twelfth of
//! the annual cap (4.75 minimum wages unless published otherwise).

use rust_decimal::Decimal;

use super::money::round_peso;
use crate::models::{AuditStep, EarningConcept, EarningItem, GratificationPolicy};

/// Share of the proportional base salary paid as gratification.
pub const GRATIFICATION_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Label of the gratification line.
pub const GRATIFICATION_LABEL: &str = "Gratificación legal";

/// The result of the gratification calculation.
#[derive(Debug, Clone)]
pub struct GratificationResult {
    /// Gratification amount, rounded to the peso.
    pub amount: Decimal,
    /// Whether the monthly cap reduced the amount.
    pub cap_applied: bool,
    /// The earning line, present when the amount is positive.
    pub earning: Option<EarningItem>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the monthly gratification.
///
/// # Arguments
///
/// * `policy` - The employee's gratification policy
/// * `proportional_base` - The rounded, prorated base salary
/// * `annual_cap` - The annual gratification cap for the period
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_gratification;
/// use payroll_engine::models::GratificationPolicy;
/// use rust_decimal::Decimal;
///
/// let capped = calculate_gratification(
///     GratificationPolicy::Capped,
///     Decimal::from(1_000_000),
///     Decimal::from(2_422_500),
///     3,
/// );
/// assert_eq!(capped.amount, Decimal::from(201_875));
/// assert!(capped.cap_applied);
/// ```
pub fn calculate_gratification(
    policy: GratificationPolicy,
    proportional_base: Decimal,
    annual_cap: Decimal,
    step_number: u32,
) -> GratificationResult {
    let uncapped = proportional_base * GRATIFICATION_RATE;
    let monthly_cap = annual_cap / Decimal::from(12);

    let (raw, cap_applied) = match policy {
        GratificationPolicy::None => (Decimal::ZERO, false),
        GratificationPolicy::Uncapped => (uncapped, false),
        GratificationPolicy::Capped if uncapped > monthly_cap => (monthly_cap, true),
        GratificationPolicy::Capped => (uncapped, false),
    };
    let amount = round_peso(raw);

    let earning = (amount > Decimal::ZERO)
        .then(|| EarningItem::taxable(EarningConcept::Gratification, GRATIFICATION_LABEL, amount));

    let reasoning = match policy {
        GratificationPolicy::None => "No gratification policy - nothing paid".to_string(),
        _ if cap_applied => format!(
            "25% × ${} = ${} capped at ${} (annual cap ${} / 12)",
            proportional_base,
            uncapped.normalize(),
            amount,
            annual_cap.normalize()
        ),
        _ => format!("25% × ${} = ${}", proportional_base, amount),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "gratification".to_string(),
        rule_name: "Legal Gratification".to_string(),
        legal_ref: "Código del Trabajo art. 50".to_string(),
        input: serde_json::json!({
            "policy": policy,
            "proportional_base": proportional_base.to_string(),
            "annual_cap": annual_cap.normalize().to_string()
        }),
        output: serde_json::json!({
            "monthly_cap": monthly_cap.round_dp(2).normalize().to_string(),
            "amount": amount.to_string(),
            "cap_applied": cap_applied
        }),
        reasoning,
    };

    GratificationResult {
        amount,
        cap_applied,
        earning,
        audit_step,
    }
}
