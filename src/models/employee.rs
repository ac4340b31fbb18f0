//! Employee snapshot and related types.
//!
//! The snapshot is the read-only view of the employee master record that the
//! engine and the exporter consume. Fields that the master record may lack
//! are optional here; the engine and the exporter decide which of them are
//! mandatory for their own purposes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::dates::{flexible_date, flexible_date_opt};

/// The employee's legal gender as recorded for social-security purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

/// Nationality class used by the regulatory export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nationality {
    /// Chilean national.
    #[default]
    Chilean,
    /// Foreign national.
    Foreign,
}

/// The type of employment contract.
///
/// The contract type decides the employee-side unemployment-insurance rate:
/// only open-ended contracts carry a positive employee rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Open-ended (indefinido).
    #[default]
    Indefinite,
    /// Fixed-term (plazo fijo).
    FixedTerm,
    /// For a specific project or task (obra o faena).
    PerProject,
    /// Apprenticeship contract.
    Apprentice,
}

impl ContractType {
    /// Returns true when the employee pays the unemployment-insurance rate.
    pub fn has_employee_unemployment_rate(self) -> bool {
        matches!(self, ContractType::Indefinite)
    }
}

/// Workday arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkdayType {
    /// Full-time workday.
    #[default]
    FullTime,
    /// Part-time workday.
    PartTime,
}

/// How the legal gratification is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GratificationPolicy {
    /// No monthly gratification.
    #[default]
    None,
    /// 25% of salary, capped at one twelfth of the annual cap.
    Capped,
    /// Flat 25% of salary.
    Uncapped,
}

/// Pension regime the employee contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PensionRegime {
    /// Private pension fund administrator (AFP).
    Afp,
    /// Public pension institute (IPS, former INP).
    Ips,
    /// Not affiliated to any pension institution.
    None,
}

impl PensionRegime {
    /// Returns true when the regime requires a named pension fund.
    pub fn requires_fund(self) -> bool {
        matches!(self, PensionRegime::Afp)
    }
}

/// Health scheme the employee contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthScheme {
    /// Public health fund.
    Fonasa,
    /// Private health insurer.
    Isapre,
}

/// The health plan negotiated with an Isapre.
///
/// A negotiated plan can only raise the health discount above the legal 7%
/// floor, never lower it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HealthPlan {
    /// Only the legal 7% minimum.
    #[default]
    LegalMinimum,
    /// A fixed amount expressed in UF.
    Uf {
        /// Plan price in UF.
        amount: Decimal,
    },
    /// A percentage of the capped taxable base, in percentage points (e.g. 8.5).
    Percentage {
        /// The negotiated rate in percentage points.
        rate: Decimal,
    },
}

/// Tax regime of a voluntary pension savings (APV) election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsRegime {
    /// Regime B: deducted before income tax.
    PreTax,
    /// Regime A: deducted after income tax.
    PostTax,
}

/// A voluntary pension savings election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoluntarySavings {
    /// Tax regime of the savings.
    pub regime: SavingsRegime,
    /// Monthly amount in pesos.
    pub amount: Decimal,
}

/// A bonus line, either recurring (on the snapshot) or ad hoc (on the overrides).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    /// Name shown on the settlement.
    pub name: String,
    /// Amount in pesos.
    pub amount: Decimal,
    /// Whether the bonus is subject to discounts and income tax.
    #[serde(default = "default_true")]
    pub taxable: bool,
}

fn default_true() -> bool {
    true
}

/// Read-only view of an employee master record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSnapshot {
    /// Unique identifier for the employee.
    pub id: String,
    /// National ID (RUT) including its check character, e.g. "12.345.678-5".
    pub national_id: String,
    /// Given names.
    pub first_names: String,
    /// Paternal surname.
    pub paternal_surname: String,
    /// Maternal surname.
    #[serde(default)]
    pub maternal_surname: String,
    /// Date of birth.
    #[serde(default, deserialize_with = "flexible_date_opt")]
    pub birth_date: Option<NaiveDate>,
    /// Gender.
    pub gender: Gender,
    /// Nationality.
    #[serde(default)]
    pub nationality: Nationality,
    /// First day of the contract. Required by the engine.
    #[serde(default, deserialize_with = "flexible_date_opt")]
    pub contract_start: Option<NaiveDate>,
    /// Last day of the contract, if it has one.
    #[serde(default, deserialize_with = "flexible_date_opt")]
    pub contract_end: Option<NaiveDate>,
    /// Monthly base salary in pesos.
    pub base_salary: Decimal,
    /// Contracted weekly hours.
    #[serde(default = "default_weekly_hours")]
    pub weekly_hours: Decimal,
    /// Contract type.
    #[serde(default)]
    pub contract_type: ContractType,
    /// Workday arrangement.
    #[serde(default)]
    pub workday_type: WorkdayType,
    /// Gratification policy.
    #[serde(default)]
    pub gratification: GratificationPolicy,
    /// Pension regime.
    #[serde(default)]
    pub pension_regime: Option<PensionRegime>,
    /// Pension fund name (e.g. "Habitat"), required when the regime is AFP.
    #[serde(default)]
    pub pension_fund: Option<String>,
    /// Health scheme.
    #[serde(default)]
    pub health_scheme: Option<HealthScheme>,
    /// Isapre name, required when the scheme is Isapre.
    #[serde(default)]
    pub isapre: Option<String>,
    /// Negotiated health plan.
    #[serde(default)]
    pub health_plan: HealthPlan,
    /// Voluntary pension savings election.
    #[serde(default)]
    pub voluntary_savings: Option<VoluntarySavings>,
    /// Whether the employee participates in unemployment insurance.
    #[serde(default = "default_true")]
    pub unemployment_insurance: bool,
    /// Whether the employee receives family allowance.
    #[serde(default)]
    pub family_allowance_enrolled: bool,
    /// Number of recognised dependents.
    #[serde(default)]
    pub dependents: u32,
    /// Family-allowance bracket declared on the master record ("A".."D").
    #[serde(default)]
    pub family_allowance_bracket: Option<String>,
    /// Monthly transport allowance in pesos (non-taxable, prorated).
    #[serde(default)]
    pub transport_allowance: Decimal,
    /// Monthly meal allowance in pesos (non-taxable, prorated).
    #[serde(default)]
    pub meal_allowance: Decimal,
    /// Recurring fixed bonuses (prorated).
    #[serde(default)]
    pub fixed_bonuses: Vec<Bonus>,
}

fn default_weekly_hours() -> Decimal {
    Decimal::from(45)
}

impl EmployeeSnapshot {
    /// Returns true if the contract covers at least one day of the
    /// inclusive range `[first, last]`.
    ///
    /// An employee without a contract start never overlaps.
    pub fn contract_overlaps(&self, first: NaiveDate, last: NaiveDate) -> bool {
        match self.contract_start {
            Some(start) => start <= last && self.contract_end.is_none_or(|end| end >= first),
            None => false,
        }
    }

    /// Full name as "names paternal maternal".
    pub fn full_name(&self) -> String {
        [
            self.first_names.as_str(),
            self.paternal_surname.as_str(),
            self.maternal_surname.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}
