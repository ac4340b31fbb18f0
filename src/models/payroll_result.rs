//! Payroll result models.
//!
//! This module contains the [`PayrollResult`] type and its associated
//! structures: itemized earnings and discounts, the taxable bases each
//! discount was computed on, aggregate totals, and the audit trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollPeriod;

/// Whether an earning feeds the taxable or the non-taxable aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarningKind {
    /// Subject to social-security discounts and income tax.
    Taxable,
    /// Excluded from every discount base.
    NonTaxable,
}

/// What an earning line pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarningConcept {
    /// Proportional base salary.
    BaseSalary,
    /// Legal gratification.
    Gratification,
    /// Overtime with a 50% surcharge.
    Overtime50,
    /// Overtime with a 100% surcharge.
    Overtime100,
    /// Ad-hoc bonus for the period.
    Bonus,
    /// Recurring fixed bonus.
    FixedBonus,
    /// Transport allowance.
    Transport,
    /// Meal allowance.
    Meal,
    /// State family allowance.
    FamilyAllowance,
}

/// Which aggregate a discount feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Mandatory or voluntary social-security contributions.
    Previsional,
    /// Income tax.
    Tax,
    /// Anything else (advances).
    Other,
}

/// What a discount line withholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountConcept {
    /// Mandatory pension contribution.
    Pension,
    /// Health contribution (legal minimum or negotiated plan).
    Health,
    /// Employee-side unemployment insurance.
    Unemployment,
    /// Voluntary savings deducted before tax (regime B).
    VoluntarySavingsPreTax,
    /// Voluntary savings deducted after tax (regime A).
    VoluntarySavingsPostTax,
    /// Progressive income tax.
    IncomeTax,
    /// Cash advance already paid.
    CashAdvance,
}

impl DiscountConcept {
    /// The aggregate this concept feeds.
    pub fn kind(self) -> DiscountKind {
        match self {
            DiscountConcept::IncomeTax => DiscountKind::Tax,
            DiscountConcept::CashAdvance => DiscountKind::Other,
            _ => DiscountKind::Previsional,
        }
    }
}

/// A single earning line. Amounts are whole pesos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningItem {
    /// What the line pays for.
    pub concept: EarningConcept,
    /// Label shown on the settlement.
    pub name: String,
    /// Amount in pesos, non-negative.
    pub amount: Decimal,
    /// Aggregate this line feeds.
    pub kind: EarningKind,
}

/// A single discount line. Amounts are whole pesos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountItem {
    /// What the line withholds.
    pub concept: DiscountConcept,
    /// Label shown on the settlement.
    pub name: String,
    /// Amount in pesos, non-negative.
    pub amount: Decimal,
    /// Aggregate this line feeds.
    pub kind: DiscountKind,
}

impl EarningItem {
    /// Builds a taxable earning line.
    pub fn taxable(concept: EarningConcept, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            concept,
            name: name.into(),
            amount,
            kind: EarningKind::Taxable,
        }
    }

    /// Builds a non-taxable earning line.
    pub fn non_taxable(concept: EarningConcept, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            concept,
            name: name.into(),
            amount,
            kind: EarningKind::NonTaxable,
        }
    }
}

impl DiscountItem {
    /// Builds a discount line, tagged by its concept.
    pub fn new(concept: DiscountConcept, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            concept,
            name: name.into(),
            amount,
            kind: concept.kind(),
        }
    }
}

/// The bases each discount was computed on, after caps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxableBases {
    /// Base for the pension discount.
    pub pension: Decimal,
    /// Base for the health discount.
    pub health: Decimal,
    /// Base for unemployment insurance.
    pub unemployment: Decimal,
    /// Base passed to the progressive tax calculator.
    pub income_tax: Decimal,
}

/// Aggregates over the itemized lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayrollTotals {
    /// Sum of taxable earnings.
    pub taxable_earnings: Decimal,
    /// Sum of non-taxable earnings.
    pub non_taxable_earnings: Decimal,
    /// Taxable plus non-taxable earnings.
    pub total_earnings: Decimal,
    /// Sum of previsional discounts.
    pub previsional_discounts: Decimal,
    /// Sum of tax discounts.
    pub tax_discounts: Decimal,
    /// Sum of other discounts.
    pub other_discounts: Decimal,
    /// Sum of every discount.
    pub total_discounts: Decimal,
    /// Total earnings minus total discounts.
    pub net_salary: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Legal reference for this rule.
    pub legal_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag situations that do not stop the calculation but deserve a
/// second look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The computed settlement for one employee in one period.
///
/// A result is never patched; when inputs change it is recomputed whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// The employee the settlement belongs to.
    pub employee_id: String,
    /// The period the settlement covers.
    pub period: PayrollPeriod,
    /// The version of the engine that produced the settlement.
    pub engine_version: String,
    /// Payable days on the 30-day scale.
    pub worked_days: u32,
    /// Absence days reported for the period.
    pub absence_days: u32,
    /// `worked_days / 30`.
    pub proportional_factor: Decimal,
    /// Itemized earnings.
    pub earnings: Vec<EarningItem>,
    /// Itemized discounts.
    pub discounts: Vec<DiscountItem>,
    /// Bases used for each discount.
    pub bases: TaxableBases,
    /// Aggregates.
    pub totals: PayrollTotals,
    /// Family-allowance bracket applied, if any.
    pub family_allowance_bracket: Option<String>,
    /// Audit trace of every calculation decision.
    pub audit_trace: AuditTrace,
}

impl PayrollResult {
    /// Sum of earning lines for a concept.
    pub fn earning_amount(&self, concept: EarningConcept) -> Decimal {
        self.earnings
            .iter()
            .filter(|e| e.concept == concept)
            .map(|e| e.amount)
            .sum()
    }

    /// Sum of discount lines for a concept.
    pub fn discount_amount(&self, concept: DiscountConcept) -> Decimal {
        self.discounts
            .iter()
            .filter(|d| d.concept == concept)
            .map(|d| d.amount)
            .sum()
    }
}
