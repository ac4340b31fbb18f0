//! Progressive income tax (impuesto único de segunda categoría).
//!
//! The tax table is expressed in UTM. The base is converted to UTM, the
//! highest bracket whose lower bound does not exceed it is selected, and
//! `(units × factor − rebate) × UTM` is charged, floored at zero.

use rust_decimal::Decimal;

use super::money::round_peso;
use crate::config::{RawNumber, RegulatoryParameters, TaxBracket};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, DiscountConcept, DiscountItem, PayrollPeriod};

/// Label of the income tax line.
pub const INCOME_TAX_LABEL: &str = "Impuesto único";

/// One parsed row of the tax table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxTableRow {
    /// Lower bound in UTM.
    pub from: Decimal,
    /// Upper bound in UTM, absent on the top bracket.
    pub to: Option<Decimal>,
    /// Marginal factor.
    pub factor: Decimal,
    /// Rebate in UTM.
    pub rebate: Decimal,
}

/// A parsed progressive tax table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTable {
    rows: Vec<TaxTableRow>,
}

fn parse_field(
    value: &RawNumber,
    index: usize,
    field: &str,
    period: &PayrollPeriod,
) -> EngineResult<Decimal> {
    value.parse().map_err(|message| EngineError::MalformedParameter {
        parameter: format!("tax_brackets[{}].{}", index, field),
        period: period.to_string(),
        message,
    })
}

impl TaxTable {
    /// Parses the raw brackets published for a period.
    ///
    /// # Errors
    ///
    /// Returns `MalformedParameter` naming the first non-numeric entry.
    pub fn parse(brackets: &[TaxBracket], period: &PayrollPeriod) -> EngineResult<Self> {
        let rows = brackets
            .iter()
            .enumerate()
            .map(|(i, b)| {
                Ok(TaxTableRow {
                    from: parse_field(&b.from, i, "from", period)?,
                    to: b
                        .to
                        .as_ref()
                        .map(|to| parse_field(to, i, "to", period))
                        .transpose()?,
                    factor: parse_field(&b.factor, i, "factor", period)?,
                    rebate: parse_field(&b.rebate, i, "rebate", period)?,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(Self { rows })
    }

    /// The parsed rows, in table order.
    pub fn rows(&self) -> &[TaxTableRow] {
        &self.rows
    }

    /// Selects the bracket for a base expressed in UTM.
    ///
    /// A bounded bracket the base exceeds is no match.
    pub fn bracket_for(&self, units: Decimal) -> Option<&TaxTableRow> {
        self.rows
            .iter()
            .filter(|row| row.from <= units)
            .max_by(|a, b| a.from.cmp(&b.from))
            .filter(|row| row.to.is_none_or(|to| units <= to))
    }

    /// Tax for a peso base, rounded to the peso. `utm` must be positive.
    pub fn tax(&self, base: Decimal, utm: Decimal) -> Decimal {
        if base <= Decimal::ZERO || utm <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let units = base / utm;
        match self.bracket_for(units) {
            Some(row) => round_peso(base * row.factor - row.rebate * utm),
            None => Decimal::ZERO,
        }
    }
}

/// Computes progressive tax for a base.
///
/// # Errors
///
/// Returns `MalformedParameter` when the UTM is not positive or a bracket
/// entry is not numeric.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::progressive_tax;
/// use payroll_engine::config::{RawNumber, TaxBracket};
/// use payroll_engine::models::PayrollPeriod;
/// use rust_decimal::Decimal;
///
/// let brackets = vec![
///     TaxBracket { from: RawNumber::Int(0), to: Some("13.5".into()), factor: RawNumber::Int(0), rebate: RawNumber::Int(0) },
///     TaxBracket { from: "13.5".into(), to: None, factor: "0.04".into(), rebate: "0.54".into() },
/// ];
/// let period = PayrollPeriod::new(2025, 1).unwrap();
///
/// let tax = progressive_tax(Decimal::from(1_500_000), Decimal::from(67_429), &brackets, &period).unwrap();
/// assert_eq!(tax, Decimal::from(23_588));
/// ```
pub fn progressive_tax(
    base: Decimal,
    utm: Decimal,
    brackets: &[TaxBracket],
    period: &PayrollPeriod,
) -> EngineResult<Decimal> {
    if base <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    if utm <= Decimal::ZERO {
        return Err(EngineError::MalformedParameter {
            parameter: "utm".to_string(),
            period: period.to_string(),
            message: format!("UTM must be positive, got {}", utm),
        });
    }
    Ok(TaxTable::parse(brackets, period)?.tax(base, utm))
}

/// The result of the income tax calculation.
#[derive(Debug, Clone)]
pub struct IncomeTaxResult {
    /// The base the tax was computed on, floored at zero.
    pub base: Decimal,
    /// Tax amount, rounded.
    pub amount: Decimal,
    /// The discount line, present when the amount is positive.
    pub discount: Option<DiscountItem>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates income tax on the tax base for the period.
pub fn calculate_income_tax(
    tax_base: Decimal,
    params: &RegulatoryParameters,
    step_number: u32,
) -> EngineResult<IncomeTaxResult> {
    let base = tax_base.max(Decimal::ZERO);
    let amount = progressive_tax(base, params.utm, &params.tax_brackets, &params.period)?;

    let units = if params.utm > Decimal::ZERO {
        (base / params.utm).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let discount = (amount > Decimal::ZERO)
        .then(|| DiscountItem::new(DiscountConcept::IncomeTax, INCOME_TAX_LABEL, amount));

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Income Tax".to_string(),
        legal_ref: "Ley sobre Impuesto a la Renta art. 43".to_string(),
        input: serde_json::json!({
            "tax_base": base.to_string(),
            "utm": params.utm.normalize().to_string()
        }),
        output: serde_json::json!({
            "base_utm": units.normalize().to_string(),
            "amount": amount.to_string()
        }),
        reasoning: format!(
            "Tax base ${} ({} UTM) → ${}",
            base,
            units.normalize(),
            amount
        ),
    };

    Ok(IncomeTaxResult {
        base,
        amount,
        discount,
        audit_step,
    })
}
