//! The fixed-position export row.
//!
//! A row is 105 fields addressed by 1-based position. Every field starts as
//! numeric zero; identity fields are filled as text and the pension and
//! health blocks are filled by the section the employee's regime and
//! scheme select.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of fields in a row.
pub const FIELD_COUNT: usize = 105;

/// Separator between fields.
pub const FIELD_SEPARATOR: char = ';';

/// Row terminator.
pub const ROW_TERMINATOR: &str = "\r\n";

/// 1-based positions of the fields the exporter fills.
pub mod field {
    /// RUT number.
    pub const RUT: usize = 1;
    /// RUT check character.
    pub const RUT_CHECK: usize = 2;
    /// Paternal surname.
    pub const PATERNAL_SURNAME: usize = 3;
    /// Maternal surname.
    pub const MATERNAL_SURNAME: usize = 4;
    /// Given names.
    pub const NAMES: usize = 5;
    /// Gender, "M" or "F".
    pub const GENDER: usize = 6;
    /// Nationality, 0 Chilean or 1 foreign.
    pub const NATIONALITY: usize = 7;
    /// Payment type.
    pub const PAYMENT_TYPE: usize = 8;
    /// Period from, `MMYYYY`.
    pub const PERIOD_FROM: usize = 9;
    /// Period to, `MMYYYY`.
    pub const PERIOD_TO: usize = 10;
    /// Pension regime: "AFP", "INP" or "SIP".
    pub const PENSION_REGIME: usize = 11;
    /// Worker type.
    pub const WORKER_TYPE: usize = 12;
    /// Worked days.
    pub const WORKED_DAYS: usize = 13;
    /// Line type.
    pub const LINE_TYPE: usize = 14;
    /// Movement code.
    pub const MOVEMENT_CODE: usize = 15;
    /// Movement start date.
    pub const MOVEMENT_FROM: usize = 16;
    /// Movement end date.
    pub const MOVEMENT_TO: usize = 17;
    /// Family allowance bracket letter.
    pub const FAMILY_BRACKET: usize = 18;
    /// Number of dependents.
    pub const DEPENDENTS: usize = 19;
    /// Family allowance amount.
    pub const FAMILY_AMOUNT: usize = 22;
    /// Pension fund code.
    pub const AFP_CODE: usize = 26;
    /// Pension taxable base.
    pub const AFP_BASE: usize = 27;
    /// Mandatory pension contribution.
    pub const AFP_CONTRIBUTION: usize = 28;
    /// Voluntary savings institution code.
    pub const APV_INSTITUTION: usize = 36;
    /// Voluntary savings amount.
    pub const APV_AMOUNT: usize = 39;
    /// IPS taxable base.
    pub const IPS_BASE: usize = 64;
    /// IPS pension contribution.
    pub const IPS_CONTRIBUTION: usize = 65;
    /// Fonasa contribution.
    pub const FONASA_CONTRIBUTION: usize = 70;
    /// Health institution code.
    pub const HEALTH_CODE: usize = 75;
    /// Isapre taxable base.
    pub const ISAPRE_BASE: usize = 77;
    /// Isapre plan currency.
    pub const ISAPRE_PLAN_CURRENCY: usize = 78;
    /// Isapre plan amount.
    pub const ISAPRE_PLAN_AMOUNT: usize = 79;
    /// Isapre mandatory 7%.
    pub const ISAPRE_MANDATORY: usize = 80;
    /// Isapre additional contribution above 7%.
    pub const ISAPRE_ADDITIONAL: usize = 81;
    /// Compensation fund code.
    pub const CCAF_CODE: usize = 83;
    /// Compensation fund taxable base.
    pub const CCAF_BASE: usize = 84;
    /// Work-accident insurer code.
    pub const MUTUAL_CODE: usize = 96;
    /// Work-accident taxable base.
    pub const MUTUAL_BASE: usize = 97;
    /// Work-accident insurer branch.
    pub const MUTUAL_BRANCH: usize = 99;
    /// Unemployment insurance taxable base.
    pub const AFC_BASE: usize = 100;
    /// Unemployment insurance employee contribution.
    pub const AFC_EMPLOYEE: usize = 101;
    /// Cost center.
    pub const COST_CENTER: usize = 105;
}

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportField {
    /// Free text; separators and line breaks are replaced on output.
    Text(String),
    /// A number, written with zero decimals.
    Number(Decimal),
}

impl ExportField {
    /// Text rendering of the field.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::export::ExportField;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(ExportField::Number(Decimal::new(700005, 1)).render(), "70001");
    /// assert_eq!(ExportField::Text("Soto;Pérez".to_string()).render(), "Soto Pérez");
    /// ```
    pub fn render(&self) -> String {
        match self {
            ExportField::Text(text) => text
                .chars()
                .map(|c| match c {
                    ';' | '\r' | '\n' => ' ',
                    other => other,
                })
                .collect(),
            ExportField::Number(n) => n
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_string(),
        }
    }
}

impl From<&str> for ExportField {
    fn from(text: &str) -> Self {
        ExportField::Text(text.to_string())
    }
}

impl From<String> for ExportField {
    fn from(text: String) -> Self {
        ExportField::Text(text)
    }
}

impl From<Decimal> for ExportField {
    fn from(n: Decimal) -> Self {
        ExportField::Number(n)
    }
}

impl From<u32> for ExportField {
    fn from(n: u32) -> Self {
        ExportField::Number(Decimal::from(n))
    }
}

impl From<u16> for ExportField {
    fn from(n: u16) -> Self {
        ExportField::Number(Decimal::from(n))
    }
}

impl From<u8> for ExportField {
    fn from(n: u8) -> Self {
        ExportField::Number(Decimal::from(n))
    }
}

/// One employee's row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    /// The employee the row belongs to.
    pub employee_id: String,
    fields: Vec<ExportField>,
}

impl ExportRow {
    /// Creates a row with every field set to numeric zero.
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            fields: vec![ExportField::Number(Decimal::ZERO); FIELD_COUNT],
        }
    }

    /// Sets the field at a 1-based position. Positions outside the row are
    /// ignored.
    pub fn set(&mut self, position: usize, value: impl Into<ExportField>) {
        if let Some(slot) = position
            .checked_sub(1)
            .and_then(|index| self.fields.get_mut(index))
        {
            *slot = value.into();
        }
    }

    /// The field at a 1-based position.
    pub fn get(&self, position: usize) -> Option<&ExportField> {
        position
            .checked_sub(1)
            .and_then(|index| self.fields.get(index))
    }

    /// All fields in order.
    pub fn fields(&self) -> &[ExportField] {
        &self.fields
    }

    /// The row as one line, without terminator.
    pub fn to_line(&self) -> String {
        self.fields
            .iter()
            .map(ExportField::render)
            .collect::<Vec<_>>()
            .join(&FIELD_SEPARATOR.to_string())
    }
}
