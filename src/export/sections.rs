//! Conditional row sections.
//!
//! Which pension and health fields a row carries depends on the employee's
//! regime and scheme. Each combination is a variant that knows the fields
//! it fills, so the builder never branches on provider names itself.

use rust_decimal::Decimal;

use super::codes::{HealthInstitution, PensionFund};
use super::row::{ExportRow, field};
use crate::calculation::{HEALTH_LEGAL_RATE, round_peso};
use crate::models::{
    DiscountConcept, EmployeeSnapshot, HealthScheme, PayrollResult, PensionRegime,
};

/// Regime texts for the regime field.
const PENSION_REGIME_AFP: &str = "AFP";
const PENSION_REGIME_IPS: &str = "INP";
const PENSION_REGIME_NONE: &str = "SIP";

/// Plan currency code for amounts in pesos.
const PLAN_CURRENCY_PESOS: u8 = 1;

/// The pension block of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PensionSection {
    /// Affiliated to a pension fund administrator.
    Afp {
        /// Fund code.
        code: u16,
        /// Capped taxable base.
        base: Decimal,
        /// Mandatory contribution.
        contribution: Decimal,
    },
    /// Affiliated to the public pension institute.
    Ips {
        /// Capped taxable base.
        base: Decimal,
        /// Pension contribution.
        contribution: Decimal,
    },
    /// Not affiliated.
    Unaffiliated,
}

impl PensionSection {
    /// Selects the section for an employee with a known regime.
    pub fn for_employee(
        regime: PensionRegime,
        employee: &EmployeeSnapshot,
        result: &PayrollResult,
    ) -> Self {
        let contribution = result.discount_amount(DiscountConcept::Pension);
        match regime {
            PensionRegime::Afp => PensionSection::Afp {
                code: PensionFund::from_name(employee.pension_fund.as_deref().unwrap_or_default())
                    .code(),
                base: result.bases.pension,
                contribution,
            },
            PensionRegime::Ips => PensionSection::Ips {
                base: result.bases.pension,
                contribution,
            },
            PensionRegime::None => PensionSection::Unaffiliated,
        }
    }

    /// Regime text for the regime field.
    pub fn regime_text(&self) -> &'static str {
        match self {
            PensionSection::Afp { .. } => PENSION_REGIME_AFP,
            PensionSection::Ips { .. } => PENSION_REGIME_IPS,
            PensionSection::Unaffiliated => PENSION_REGIME_NONE,
        }
    }

    /// Writes the section's fields.
    pub fn apply(&self, row: &mut ExportRow) {
        row.set(field::PENSION_REGIME, self.regime_text());
        match *self {
            PensionSection::Afp {
                code,
                base,
                contribution,
            } => {
                row.set(field::AFP_CODE, code);
                row.set(field::AFP_BASE, base);
                row.set(field::AFP_CONTRIBUTION, contribution);
            }
            PensionSection::Ips { base, contribution } => {
                row.set(field::IPS_BASE, base);
                row.set(field::IPS_CONTRIBUTION, contribution);
            }
            PensionSection::Unaffiliated => {}
        }
    }
}

/// The health block of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthSection {
    /// Public health fund.
    Fonasa {
        /// Health contribution.
        contribution: Decimal,
    },
    /// Private insurer.
    Isapre {
        /// Insurer code.
        code: u16,
        /// Capped taxable base.
        base: Decimal,
        /// Total health discount.
        contribution: Decimal,
        /// Legal 7% share of the contribution.
        mandatory: Decimal,
    },
}

impl HealthSection {
    /// Selects the section for an employee with a known scheme.
    pub fn for_employee(
        scheme: HealthScheme,
        employee: &EmployeeSnapshot,
        result: &PayrollResult,
    ) -> Self {
        let contribution = result.discount_amount(DiscountConcept::Health);
        match scheme {
            HealthScheme::Fonasa => HealthSection::Fonasa { contribution },
            HealthScheme::Isapre => HealthSection::Isapre {
                code: HealthInstitution::from_name(employee.isapre.as_deref().unwrap_or_default())
                    .code(),
                base: result.bases.health,
                contribution,
                mandatory: round_peso(result.bases.health * HEALTH_LEGAL_RATE).min(contribution),
            },
        }
    }

    /// Writes the section's fields.
    pub fn apply(&self, row: &mut ExportRow) {
        match *self {
            HealthSection::Fonasa { contribution } => {
                row.set(field::HEALTH_CODE, HealthInstitution::Fonasa.code());
                row.set(field::FONASA_CONTRIBUTION, contribution);
            }
            HealthSection::Isapre {
                code,
                base,
                contribution,
                mandatory,
            } => {
                row.set(field::HEALTH_CODE, code);
                row.set(field::ISAPRE_BASE, base);
                row.set(field::ISAPRE_PLAN_CURRENCY, PLAN_CURRENCY_PESOS);
                row.set(field::ISAPRE_PLAN_AMOUNT, contribution);
                row.set(field::ISAPRE_MANDATORY, mandatory);
                row.set(field::ISAPRE_ADDITIONAL, contribution - mandatory);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportField;
    use crate::models::{
        AuditTrace, DiscountItem, PayrollPeriod, PayrollTotals, TaxableBases,
    };
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee() -> EmployeeSnapshot {
        serde_json::from_value(serde_json::json!({
            "id": "emp_001",
            "national_id": "12345678-5",
            "first_names": "Ana",
            "paternal_surname": "Soto",
            "gender": "female",
            "base_salary": "1000000",
            "pension_fund": "Habitat",
            "isapre": "Colmena"
        }))
        .unwrap()
    }

    fn create_test_result(pension: &str, health: &str) -> PayrollResult {
        PayrollResult {
            employee_id: "emp_001".to_string(),
            period: PayrollPeriod::new(2025, 1).unwrap(),
            engine_version: "test".to_string(),
            worked_days: 30,
            absence_days: 0,
            proportional_factor: Decimal::ONE,
            earnings: vec![],
            discounts: vec![
                DiscountItem::new(DiscountConcept::Pension, "AFP Habitat", dec(pension)),
                DiscountItem::new(DiscountConcept::Health, "Salud", dec(health)),
            ],
            bases: TaxableBases {
                pension: dec("1000000"),
                health: dec("1000000"),
                unemployment: dec("1000000"),
                income_tax: dec("800000"),
            },
            totals: PayrollTotals::default(),
            family_allowance_bracket: None,
            audit_trace: AuditTrace::default(),
        }
    }

    fn number(row: &ExportRow, position: usize) -> String {
        row.get(position).unwrap().render()
    }

    #[test]
    fn test_afp_section_fills_afp_block_only() {
        let section = PensionSection::for_employee(
            PensionRegime::Afp,
            &create_test_employee(),
            &create_test_result("112700", "70000"),
        );
        let mut row = ExportRow::new("emp_001");
        section.apply(&mut row);

        assert_eq!(number(&row, field::PENSION_REGIME), "AFP");
        assert_eq!(number(&row, field::AFP_CODE), "5");
        assert_eq!(number(&row, field::AFP_BASE), "1000000");
        assert_eq!(number(&row, field::AFP_CONTRIBUTION), "112700");
        assert_eq!(number(&row, field::IPS_BASE), "0");
    }

    #[test]
    fn test_ips_section_fills_ips_block_only() {
        let section = PensionSection::for_employee(
            PensionRegime::Ips,
            &create_test_employee(),
            &create_test_result("18700", "70000"),
        );
        let mut row = ExportRow::new("emp_001");
        section.apply(&mut row);

        assert_eq!(number(&row, field::PENSION_REGIME), "INP");
        assert_eq!(number(&row, field::IPS_BASE), "1000000");
        assert_eq!(number(&row, field::IPS_CONTRIBUTION), "18700");
        assert_eq!(number(&row, field::AFP_CODE), "0");
        // Regime, base and contribution are the only fields written.
        assert_eq!(
            row.fields()
                .iter()
                .filter(|f| **f != ExportField::Number(Decimal::ZERO))
                .count(),
            3
        );
    }

    #[test]
    fn test_unaffiliated_section_only_sets_regime() {
        let section = PensionSection::for_employee(
            PensionRegime::None,
            &create_test_employee(),
            &create_test_result("0", "70000"),
        );
        let mut row = ExportRow::new("emp_001");
        section.apply(&mut row);

        assert_eq!(number(&row, field::PENSION_REGIME), "SIP");
        assert_eq!(
            row.fields()
                .iter()
                .filter(|f| **f != ExportField::Number(Decimal::ZERO))
                .count(),
            1
        );
    }

    #[test]
    fn test_fonasa_section() {
        let section = HealthSection::for_employee(
            HealthScheme::Fonasa,
            &create_test_employee(),
            &create_test_result("112700", "70000"),
        );
        let mut row = ExportRow::new("emp_001");
        section.apply(&mut row);

        assert_eq!(number(&row, field::HEALTH_CODE), "7");
        assert_eq!(number(&row, field::FONASA_CONTRIBUTION), "70000");
        assert_eq!(number(&row, field::ISAPRE_BASE), "0");
    }

    #[test]
    fn test_isapre_section_splits_mandatory_and_additional() {
        let section = HealthSection::for_employee(
            HealthScheme::Isapre,
            &create_test_employee(),
            &create_test_result("112700", "114000"),
        );
        let mut row = ExportRow::new("emp_001");
        section.apply(&mut row);

        assert_eq!(number(&row, field::HEALTH_CODE), "4");
        assert_eq!(number(&row, field::ISAPRE_BASE), "1000000");
        assert_eq!(number(&row, field::ISAPRE_PLAN_AMOUNT), "114000");
        assert_eq!(number(&row, field::ISAPRE_MANDATORY), "70000");
        assert_eq!(number(&row, field::ISAPRE_ADDITIONAL), "44000");
        assert_eq!(number(&row, field::FONASA_CONTRIBUTION), "0");
    }
}
