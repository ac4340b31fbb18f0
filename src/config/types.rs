//! Configuration types for regulatory parameters.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML parameter files, and the resolved [`RegulatoryParameters`] snapshot
//! the engine computes against.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollPeriod;

/// Metadata about the parameter set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSetMetadata {
    /// Jurisdiction code (e.g., "CL").
    pub code: String,
    /// Human-readable name of the parameter set.
    pub name: String,
    /// Version or publication date of the set.
    pub version: String,
    /// Where the figures were taken from.
    pub source_url: String,
}

/// Monthly economic indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// Value of one UF (currency index) in pesos.
    pub uf: Decimal,
    /// Value of one UTM (monthly tax unit) in pesos.
    pub utm: Decimal,
    /// Monthly minimum wage in pesos.
    pub minimum_wage: Decimal,
    /// Annual gratification cap in pesos. Defaults to 4.75 minimum wages.
    #[serde(default)]
    pub annual_gratification_cap: Option<Decimal>,
    /// Employee-side unemployment-insurance rate for open-ended contracts.
    #[serde(default = "default_unemployment_employee_rate")]
    pub unemployment_employee_rate: Decimal,
}

fn default_unemployment_employee_rate() -> Decimal {
    Decimal::new(6, 3)
}

/// Taxable caps, in UF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxableCaps {
    /// Cap for the pension and health bases.
    pub pension_uf: Decimal,
    /// Cap for the unemployment-insurance base.
    pub unemployment_uf: Decimal,
}

/// A number as written in a parameter file.
///
/// Tax brackets keep their numbers raw so that a corrupt entry surfaces as a
/// configuration error when the bracket is used, rather than taking down the
/// whole parameter directory at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    /// An integer literal.
    Int(i64),
    /// A floating-point literal.
    Float(f64),
    /// A quoted value.
    Text(String),
}

impl RawNumber {
    /// Parses the value as a decimal.
    pub fn parse(&self) -> Result<Decimal, String> {
        match self {
            RawNumber::Int(i) => Ok(Decimal::from(*i)),
            RawNumber::Float(f) => Decimal::from_str(&f.to_string())
                .map_err(|_| format!("'{}' is not a number", f)),
            RawNumber::Text(s) => {
                Decimal::from_str(s.trim()).map_err(|_| format!("'{}' is not a number", s))
            }
        }
    }
}

impl From<&str> for RawNumber {
    fn from(s: &str) -> Self {
        RawNumber::Text(s.to_string())
    }
}

/// One row of the progressive income-tax table, in UTM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound in UTM.
    pub from: RawNumber,
    /// Upper bound in UTM; absent on the open-ended top bracket.
    #[serde(default)]
    pub to: Option<RawNumber>,
    /// Marginal rate factor.
    pub factor: RawNumber,
    /// Amount to rebate, in UTM.
    pub rebate: RawNumber,
}

/// One row of the family-allowance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyAllowanceBracket {
    /// Bracket letter ("A".."D").
    pub bracket: String,
    /// Lower bound of taxable earnings (inclusive), in pesos.
    pub from: Decimal,
    /// Upper bound of taxable earnings (exclusive); absent on the top bracket.
    #[serde(default)]
    pub to: Option<Decimal>,
    /// Amount per dependent, in pesos.
    pub amount: Decimal,
}

impl FamilyAllowanceBracket {
    /// Returns true when `earnings` lies in `[from, to)`.
    pub fn contains(&self, earnings: Decimal) -> bool {
        earnings >= self.from && self.to.is_none_or(|to| earnings < to)
    }
}

/// The content of one period file.
///
/// Every section is optional so that a partially published month can still
/// be loaded; resolution reports which section is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodParameterFile {
    /// Year the file applies to.
    pub year: i32,
    /// Month the file applies to.
    pub month: u32,
    /// Economic indicators.
    #[serde(default)]
    pub indicators: Option<IndicatorSet>,
    /// Taxable caps.
    #[serde(default)]
    pub taxable_caps: Option<TaxableCaps>,
    /// Mandatory pension rate (contribution plus commission) by fund name.
    #[serde(default)]
    pub pension_rates: Option<BTreeMap<String, Decimal>>,
    /// Progressive income-tax table.
    #[serde(default)]
    pub tax_brackets: Option<Vec<TaxBracket>>,
    /// Family-allowance table.
    #[serde(default)]
    pub family_allowance_brackets: Option<Vec<FamilyAllowanceBracket>>,
}

/// Resolved, read-only regulatory parameters for one period.
///
/// # Example
///
/// ```
/// use payroll_engine::config::RegulatoryParameters;
/// use payroll_engine::models::PayrollPeriod;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let mut pension_rates = BTreeMap::new();
/// pension_rates.insert("Habitat".to_string(), Decimal::new(1127, 4));
///
/// let params = RegulatoryParameters {
///     period: PayrollPeriod::new(2025, 1).unwrap(),
///     uf: Decimal::from(38000),
///     utm: Decimal::from(67000),
///     minimum_wage: Decimal::from(500000),
///     annual_gratification_cap: Decimal::from(2375000),
///     pension_cap_uf: Decimal::new(878, 1),
///     unemployment_cap_uf: Decimal::new(1318, 1),
///     unemployment_employee_rate: Decimal::new(6, 3),
///     pension_rates,
///     tax_brackets: vec![],
///     family_allowance_brackets: None,
/// };
///
/// assert_eq!(params.pension_rate("habitat").unwrap(), Decimal::new(1127, 4));
/// assert_eq!(params.pension_cap_amount(), Decimal::from(3336400));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryParameters {
    /// The period these parameters apply to.
    pub period: PayrollPeriod,
    /// Value of one UF in pesos.
    pub uf: Decimal,
    /// Value of one UTM in pesos.
    pub utm: Decimal,
    /// Monthly minimum wage.
    pub minimum_wage: Decimal,
    /// Annual gratification cap in pesos.
    pub annual_gratification_cap: Decimal,
    /// Pension/health cap in UF.
    pub pension_cap_uf: Decimal,
    /// Unemployment-insurance cap in UF.
    pub unemployment_cap_uf: Decimal,
    /// Employee-side unemployment rate for open-ended contracts.
    pub unemployment_employee_rate: Decimal,
    /// Mandatory pension rate by fund name.
    pub pension_rates: BTreeMap<String, Decimal>,
    /// Progressive tax table, raw.
    pub tax_brackets: Vec<TaxBracket>,
    /// Family-allowance table, when published for the period.
    pub family_allowance_brackets: Option<Vec<FamilyAllowanceBracket>>,
}

impl RegulatoryParameters {
    /// Looks up the mandatory rate for a pension fund, ignoring case and
    /// surrounding whitespace.
    pub fn pension_rate(&self, fund: &str) -> EngineResult<Decimal> {
        let wanted = fund.trim();
        self.pension_rates
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(wanted))
            .map(|(_, rate)| *rate)
            .ok_or_else(|| EngineError::ParametersNotFound {
                parameter: format!("pension_rate:{}", wanted),
                period: self.period.to_string(),
            })
    }

    /// Pension/health cap converted to pesos.
    pub fn pension_cap_amount(&self) -> Decimal {
        self.pension_cap_uf * self.uf
    }

    /// Unemployment-insurance cap converted to pesos.
    pub fn unemployment_cap_amount(&self) -> Decimal {
        self.unemployment_cap_uf * self.uf
    }
}
