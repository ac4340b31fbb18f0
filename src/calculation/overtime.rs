//! Overtime calculation.
//!
//! Overtime is paid in two tiers: hours with a 50% surcharge and hours with
//! a 100% surcharge. Both are taxable and each tier is its own line.

use rust_decimal::Decimal;

use super::money::round_peso;
use crate::models::{AuditStep, EarningConcept, EarningItem, EmployeeSnapshot, PeriodOverrides};

/// The legal reference workweek, in hours.
pub const REFERENCE_WEEKLY_HOURS: Decimal = Decimal::from_parts(45, 0, 0, false, 0);

/// Multiplier for hours with a 50% surcharge.
pub const OVERTIME_50_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Multiplier for hours with a 100% surcharge.
pub const OVERTIME_100_MULTIPLIER: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// The result of the overtime calculation.
#[derive(Debug, Clone)]
pub struct OvertimeResult {
    /// Hourly rate the surcharges apply to, unrounded.
    pub hourly_rate: Decimal,
    /// Pay for the 50% tier, rounded.
    pub tier_50_amount: Decimal,
    /// Pay for the 100% tier, rounded.
    pub tier_100_amount: Decimal,
    /// Earning lines for each tier with a positive amount.
    pub earnings: Vec<EarningItem>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the hourly rate used for overtime.
///
/// `rate = (base_salary / 30) × weekly_hours / 45`
pub fn overtime_hourly_rate(base_salary: Decimal, weekly_hours: Decimal) -> Decimal {
    base_salary / Decimal::from(30) * weekly_hours / REFERENCE_WEEKLY_HOURS
}

/// Calculates overtime pay for the period.
///
/// The hourly rate is derived from the full monthly base salary, not the
/// prorated one.
pub fn calculate_overtime(
    employee: &EmployeeSnapshot,
    overrides: &PeriodOverrides,
    step_number: u32,
) -> OvertimeResult {
    let hourly_rate = overtime_hourly_rate(employee.base_salary, employee.weekly_hours);
    let hours_50 = overrides.overtime_hours_50.max(Decimal::ZERO);
    let hours_100 = overrides.overtime_hours_100.max(Decimal::ZERO);

    let tier_50_amount = round_peso(hourly_rate * OVERTIME_50_MULTIPLIER * hours_50);
    let tier_100_amount = round_peso(hourly_rate * OVERTIME_100_MULTIPLIER * hours_100);

    let mut earnings = Vec::new();
    if tier_50_amount > Decimal::ZERO {
        earnings.push(EarningItem::taxable(
            EarningConcept::Overtime50,
            "Horas extra 50%",
            tier_50_amount,
        ));
    }
    if tier_100_amount > Decimal::ZERO {
        earnings.push(EarningItem::taxable(
            EarningConcept::Overtime100,
            "Horas extra 100%",
            tier_100_amount,
        ));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "overtime".to_string(),
        rule_name: "Overtime".to_string(),
        legal_ref: "Código del Trabajo art. 32".to_string(),
        input: serde_json::json!({
            "base_salary": employee.base_salary.normalize().to_string(),
            "weekly_hours": employee.weekly_hours.normalize().to_string(),
            "hours_50": hours_50.normalize().to_string(),
            "hours_100": hours_100.normalize().to_string()
        }),
        output: serde_json::json!({
            "hourly_rate": hourly_rate.round_dp(4).normalize().to_string(),
            "tier_50_amount": tier_50_amount.to_string(),
            "tier_100_amount": tier_100_amount.to_string()
        }),
        reasoning: format!(
            "Rate ${}/h; {}h × 1.5 = ${}; {}h × 2 = ${}",
            hourly_rate.round_dp(2).normalize(),
            hours_50.normalize(),
            tier_50_amount,
            hours_100.normalize(),
            tier_100_amount
        ),
    };

    OvertimeResult {
        hourly_rate,
        tier_50_amount,
        tier_100_amount,
        earnings,
        audit_step,
    }
}
