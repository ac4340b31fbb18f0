//! The payroll calculation pipeline.
//!
//! [`compute`] runs every rule in order for one employee and assembles the
//! itemized [`PayrollResult`]. It performs no I/O: parameters must already
//! be resolved for the period.

use rust_decimal::Decimal;

use super::allowances::calculate_allowances;
use super::base_salary::calculate_base_salary;
use super::bonuses::calculate_bonuses;
use super::family_allowance::calculate_family_allowance;
use super::gratification::calculate_gratification;
use super::health::calculate_health;
use super::income_tax::calculate_income_tax;
use super::limits::check_limits;
use super::money::round_peso;
use super::overtime::calculate_overtime;
use super::pension::calculate_pension;
use super::unemployment::calculate_unemployment;
use super::voluntary_savings::calculate_voluntary_savings;
use super::worked_days::calculate_worked_days;
use crate::config::RegulatoryParameters;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, DiscountConcept, DiscountItem, DiscountKind,
    EarningItem, EarningKind, EmployeeSnapshot, PayrollPeriod, PayrollResult, PayrollTotals,
    PeriodOverrides, TaxableBases,
};

/// The version of the engine, recorded on every result.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Label of the cash advance line.
pub const CASH_ADVANCE_LABEL: &str = "Anticipos";

fn sum_earnings(earnings: &[EarningItem], kind: EarningKind) -> Decimal {
    earnings
        .iter()
        .filter(|e| e.kind == kind)
        .map(|e| e.amount)
        .sum()
}

fn sum_discounts(discounts: &[DiscountItem], kind: DiscountKind) -> Decimal {
    discounts
        .iter()
        .filter(|d| d.kind == kind)
        .map(|d| d.amount)
        .sum()
}

/// Aggregates rounded line items into totals.
pub fn calculate_totals(earnings: &[EarningItem], discounts: &[DiscountItem]) -> PayrollTotals {
    let taxable_earnings = sum_earnings(earnings, EarningKind::Taxable);
    let non_taxable_earnings = sum_earnings(earnings, EarningKind::NonTaxable);
    let total_earnings = taxable_earnings + non_taxable_earnings;

    let previsional_discounts = sum_discounts(discounts, DiscountKind::Previsional);
    let tax_discounts = sum_discounts(discounts, DiscountKind::Tax);
    let other_discounts = sum_discounts(discounts, DiscountKind::Other);
    let total_discounts = previsional_discounts + tax_discounts + other_discounts;

    PayrollTotals {
        taxable_earnings,
        non_taxable_earnings,
        total_earnings,
        previsional_discounts,
        tax_discounts,
        other_discounts,
        total_discounts,
        net_salary: total_earnings - total_discounts,
    }
}

/// Computes the settlement for one employee in one period.
///
/// # Arguments
///
/// * `employee` - The employee master data
/// * `period` - The month being settled
/// * `overrides` - Worked days, absences, overtime, bonuses and advances
/// * `params` - Regulatory parameters resolved for `period`
///
/// # Errors
///
/// * `InvalidEmployee` when the employee has no contract start date, or an
///   amount or hour figure is beyond any plausible settlement
/// * `ParametersNotFound` when the employee's pension fund has no rate, or
///   the employee receives family allowance and the period has no table
/// * `MalformedParameter` when the tax table cannot be used
/// * `CalculationError` when `params` were resolved for another period
///
/// Every error concerns this employee only; callers computing a roster
/// continue with the rest.
pub fn compute(
    employee: &EmployeeSnapshot,
    period: &PayrollPeriod,
    overrides: &PeriodOverrides,
    params: &RegulatoryParameters,
) -> EngineResult<PayrollResult> {
    if params.period != *period {
        return Err(EngineError::CalculationError {
            message: format!(
                "parameters for {} cannot settle period {}",
                params.period, period
            ),
        });
    }

    check_limits(employee, overrides)?;

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut earnings: Vec<EarningItem> = Vec::new();
    let mut discounts: Vec<DiscountItem> = Vec::new();

    // Step 1: Worked days
    let worked = calculate_worked_days(employee, period, overrides, 1)?;
    let factor = worked.proportional_factor;
    steps.push(worked.audit_step);
    warnings.extend(worked.warnings);

    // Step 2: Base salary
    let base_salary = calculate_base_salary(employee, factor, 2);
    earnings.extend(base_salary.earning);
    steps.push(base_salary.audit_step);

    // Step 3: Gratification
    let gratification = calculate_gratification(
        employee.gratification,
        base_salary.amount,
        params.annual_gratification_cap,
        3,
    );
    earnings.extend(gratification.earning);
    steps.push(gratification.audit_step);

    // Step 4: Overtime
    let overtime = calculate_overtime(employee, overrides, 4);
    earnings.extend(overtime.earnings);
    steps.push(overtime.audit_step);

    // Step 5: Bonuses
    let bonuses = calculate_bonuses(&overrides.bonuses, &employee.fixed_bonuses, factor, 5);
    earnings.extend(bonuses.earnings);
    steps.push(bonuses.audit_step);

    // Step 6: Transport and meal
    let allowances = calculate_allowances(employee, factor, 6);
    earnings.extend(allowances.earnings);
    steps.push(allowances.audit_step);

    let taxable_earnings = sum_earnings(&earnings, EarningKind::Taxable);

    // Step 7: Family allowance
    let family = calculate_family_allowance(employee, taxable_earnings, params, 7)?;
    earnings.extend(family.earning);
    steps.push(family.audit_step);
    warnings.extend(family.warnings);

    // Step 8: Pension
    let pension = calculate_pension(employee, taxable_earnings, params, 8)?;
    discounts.extend(pension.discount);
    steps.push(pension.audit_step);
    warnings.extend(pension.warnings);

    // Step 9: Health
    let health = calculate_health(employee, taxable_earnings, params, 9);
    discounts.extend(health.discount);
    steps.push(health.audit_step);
    warnings.extend(health.warnings);

    // Step 10: Unemployment insurance
    let unemployment = calculate_unemployment(employee, taxable_earnings, params, 10);
    discounts.extend(unemployment.discount);
    steps.push(unemployment.audit_step);

    // Step 11: Voluntary savings; regime B lowers the tax base
    let savings = calculate_voluntary_savings(employee, 11);
    let post_tax_savings = savings
        .discount
        .as_ref()
        .filter(|d| d.concept == DiscountConcept::VoluntarySavingsPostTax)
        .cloned();
    if savings.pre_tax_amount > Decimal::ZERO {
        discounts.extend(savings.discount);
    }
    steps.push(savings.audit_step);

    // Step 12: Income tax
    let tax_base = taxable_earnings
        - (pension.amount + health.amount + unemployment.amount + savings.pre_tax_amount);
    let income_tax = calculate_income_tax(tax_base, params, 12)?;
    discounts.extend(income_tax.discount);
    steps.push(income_tax.audit_step);

    // Step 13: After-tax discounts
    discounts.extend(post_tax_savings);
    let cash_advances = round_peso(overrides.cash_advances);
    if cash_advances > Decimal::ZERO {
        discounts.push(DiscountItem::new(
            DiscountConcept::CashAdvance,
            CASH_ADVANCE_LABEL,
            cash_advances,
        ));
    }

    let totals = calculate_totals(&earnings, &discounts);
    if totals.net_salary < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "NEGATIVE_NET_SALARY".to_string(),
            message: format!("Discounts exceed earnings by ${}", -totals.net_salary),
            severity: "high".to_string(),
        });
    }

    steps.push(AuditStep {
        step_number: 13,
        rule_id: "totals".to_string(),
        rule_name: "Settlement Totals".to_string(),
        legal_ref: "Código del Trabajo art. 54".to_string(),
        input: serde_json::json!({
            "earning_lines": earnings.len(),
            "discount_lines": discounts.len(),
            "post_tax_savings": savings.post_tax_amount.to_string(),
            "cash_advances": cash_advances.to_string()
        }),
        output: serde_json::json!({
            "total_earnings": totals.total_earnings.to_string(),
            "total_discounts": totals.total_discounts.to_string(),
            "net_salary": totals.net_salary.to_string()
        }),
        reasoning: format!(
            "${} earnings − ${} discounts = ${} net",
            totals.total_earnings, totals.total_discounts, totals.net_salary
        ),
    });

    tracing::debug!(
        employee_id = %employee.id,
        period = %period,
        worked_days = worked.worked_days,
        net_salary = %totals.net_salary,
        warnings = warnings.len(),
        "Computed payroll"
    );

    Ok(PayrollResult {
        employee_id: employee.id.clone(),
        period: *period,
        engine_version: ENGINE_VERSION.to_string(),
        worked_days: worked.worked_days,
        absence_days: worked.absence_days,
        proportional_factor: factor,
        earnings,
        discounts,
        bases: TaxableBases {
            pension: pension.base,
            health: health.base,
            unemployment: unemployment.base,
            income_tax: income_tax.base,
        },
        totals,
        family_allowance_bracket: family.bracket,
        audit_trace: AuditTrace { steps, warnings },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FamilyAllowanceBracket, TaxBracket};
    use crate::models::{Bonus, DiscountConcept, EarningConcept};
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn period() -> PayrollPeriod {
        PayrollPeriod::new(2025, 1).unwrap()
    }

    fn bracket(from: &str, to: Option<&str>, factor: &str, rebate: &str) -> TaxBracket {
        TaxBracket {
            from: from.into(),
            to: to.map(Into::into),
            factor: factor.into(),
            rebate: rebate.into(),
        }
    }

    fn create_test_params() -> RegulatoryParameters {
        let mut pension_rates = BTreeMap::new();
        pension_rates.insert("Test".to_string(), dec("0.11"));
        pension_rates.insert("Habitat".to_string(), dec("0.1127"));
        RegulatoryParameters {
            period: period(),
            uf: dec("38384.41"),
            utm: dec("67429"),
            minimum_wage: dec("510000"),
            annual_gratification_cap: dec("2422500"),
            pension_cap_uf: dec("87.8"),
            unemployment_cap_uf: dec("131.8"),
            unemployment_employee_rate: dec("0.006"),
            pension_rates,
            tax_brackets: vec![
                bracket("0", Some("13.5"), "0", "0"),
                bracket("13.5", Some("30"), "0.04", "0.54"),
                bracket("30", Some("50"), "0.08", "1.74"),
                bracket("50", None, "0.135", "4.49"),
            ],
            family_allowance_brackets: Some(vec![
                FamilyAllowanceBracket {
                    bracket: "A".to_string(),
                    from: dec("0"),
                    to: Some(dec("586227")),
                    amount: dec("21243"),
                },
                FamilyAllowanceBracket {
                    bracket: "D".to_string(),
                    from: dec("586227"),
                    to: None,
                    amount: dec("0"),
                },
            ]),
        }
    }

    fn create_test_employee() -> EmployeeSnapshot {
        serde_json::from_value(serde_json::json!({
            "id": "emp_001",
            "national_id": "12345678-5",
            "first_names": "Ana María",
            "paternal_surname": "Soto",
            "maternal_surname": "Pérez",
            "gender": "female",
            "contract_start": "2020-03-01",
            "base_salary": "1000000",
            "pension_regime": "afp",
            "pension_fund": "Test",
            "health_scheme": "fonasa"
        }))
        .unwrap()
    }

    #[test]
    fn test_reference_example_full_month() {
        let result = compute(
            &create_test_employee(),
            &period(),
            &PeriodOverrides::default(),
            &create_test_params(),
        )
        .unwrap();

        assert_eq!(result.worked_days, 30);
        assert_eq!(result.totals.taxable_earnings, dec("1000000"));
        assert_eq!(result.discount_amount(DiscountConcept::Pension), dec("110000"));
        assert_eq!(result.discount_amount(DiscountConcept::Health), dec("70000"));
        assert_eq!(result.discount_amount(DiscountConcept::Unemployment), dec("6000"));
        // 814,000 is about 12.07 UTM, inside the exempt bracket.
        assert_eq!(result.bases.income_tax, dec("814000"));
        assert_eq!(result.discount_amount(DiscountConcept::IncomeTax), Decimal::ZERO);
        assert_eq!(result.totals.net_salary, dec("814000"));
        assert_eq!(
            result.totals.net_salary,
            result.totals.total_earnings - result.totals.total_discounts
        );
    }

    #[test]
    fn test_hire_on_the_15th() {
        let mut employee = create_test_employee();
        employee.contract_start = chrono::NaiveDate::from_ymd_opt(2025, 1, 15);

        let result =
            compute(&employee, &period(), &PeriodOverrides::default(), &create_test_params())
                .unwrap();

        assert_eq!(result.worked_days, 16);
        assert_eq!(result.proportional_factor.round_dp(3), dec("0.533"));
        assert_eq!(result.earning_amount(EarningConcept::BaseSalary), dec("533333"));
    }

    #[test]
    fn test_gratification_and_tax_with_capped_policy() {
        let mut employee = create_test_employee();
        employee.base_salary = dec("1500000");
        employee.gratification = crate::models::GratificationPolicy::Capped;

        let result =
            compute(&employee, &period(), &PeriodOverrides::default(), &create_test_params())
                .unwrap();

        // 25% of 1,500,000 exceeds 2,422,500 / 12 = 201,875.
        assert_eq!(result.earning_amount(EarningConcept::Gratification), dec("201875"));
        assert_eq!(result.totals.taxable_earnings, dec("1701875"));
        // 1,701,875 × 0.11 = 187,206.25; × 0.07 = 119,131.25; × 0.006 = 10,211.25
        assert_eq!(result.discount_amount(DiscountConcept::Pension), dec("187206"));
        assert_eq!(result.discount_amount(DiscountConcept::Health), dec("119131"));
        assert_eq!(result.discount_amount(DiscountConcept::Unemployment), dec("10211"));
        // 1,701,875 − 316,548 = 1,385,327; × 0.04 − 0.54 × 67,429 = 19,001.42
        assert_eq!(result.bases.income_tax, dec("1385327"));
        assert_eq!(result.discount_amount(DiscountConcept::IncomeTax), dec("19001"));
        assert_eq!(
            result.totals.net_salary,
            result.totals.total_earnings - result.totals.total_discounts
        );
    }

    #[test]
    fn test_pre_tax_savings_lower_the_tax_base_post_tax_do_not() {
        let mut employee = create_test_employee();
        employee.base_salary = dec("2000000");

        employee.voluntary_savings = Some(crate::models::VoluntarySavings {
            regime: crate::models::SavingsRegime::PreTax,
            amount: dec("100000"),
        });
        let pre = compute(&employee, &period(), &PeriodOverrides::default(), &create_test_params())
            .unwrap();

        employee.voluntary_savings = Some(crate::models::VoluntarySavings {
            regime: crate::models::SavingsRegime::PostTax,
            amount: dec("100000"),
        });
        let post =
            compute(&employee, &period(), &PeriodOverrides::default(), &create_test_params())
                .unwrap();

        assert_eq!(pre.bases.income_tax + dec("100000"), post.bases.income_tax);
        assert!(
            pre.discount_amount(DiscountConcept::IncomeTax)
                < post.discount_amount(DiscountConcept::IncomeTax)
        );

        // Post-tax savings come after the tax line.
        let tax_index = post
            .discounts
            .iter()
            .position(|d| d.concept == DiscountConcept::IncomeTax)
            .unwrap();
        let savings_index = post
            .discounts
            .iter()
            .position(|d| d.concept == DiscountConcept::VoluntarySavingsPostTax)
            .unwrap();
        assert!(savings_index > tax_index);
    }

    #[test]
    fn test_non_taxable_items_do_not_feed_discounts() {
        let mut employee = create_test_employee();
        employee.transport_allowance = dec("40000");
        employee.meal_allowance = dec("60000");
        let overrides = PeriodOverrides {
            bonuses: vec![Bonus {
                name: "Aguinaldo".to_string(),
                amount: dec("50000"),
                taxable: false,
            }],
            ..PeriodOverrides::default()
        };

        let result = compute(&employee, &period(), &overrides, &create_test_params()).unwrap();

        assert_eq!(result.totals.taxable_earnings, dec("1000000"));
        assert_eq!(result.totals.non_taxable_earnings, dec("150000"));
        assert_eq!(result.discount_amount(DiscountConcept::Pension), dec("110000"));
        assert_eq!(result.totals.net_salary, dec("964000"));
    }

    #[test]
    fn test_family_allowance_and_cash_advance() {
        let mut employee = create_test_employee();
        employee.base_salary = dec("500000");
        employee.family_allowance_enrolled = true;
        employee.dependents = 2;
        let overrides = PeriodOverrides {
            cash_advances: dec("100000"),
            ..PeriodOverrides::default()
        };

        let result = compute(&employee, &period(), &overrides, &create_test_params()).unwrap();

        assert_eq!(result.family_allowance_bracket.as_deref(), Some("A"));
        assert_eq!(result.earning_amount(EarningConcept::FamilyAllowance), dec("42486"));
        assert_eq!(result.discount_amount(DiscountConcept::CashAdvance), dec("100000"));
        assert_eq!(result.totals.other_discounts, dec("100000"));
    }

    #[test]
    fn test_overtime_is_taxable() {
        let overrides = PeriodOverrides {
            overtime_hours_50: dec("10"),
            ..PeriodOverrides::default()
        };
        let result = compute(
            &create_test_employee(),
            &period(),
            &overrides,
            &create_test_params(),
        )
        .unwrap();

        // 1,000,000 / 30 = 33,333.33/h × 1.5 × 10 = 500,000
        assert_eq!(result.earning_amount(EarningConcept::Overtime50), dec("500000"));
        assert_eq!(result.totals.taxable_earnings, dec("1500000"));
    }

    #[test]
    fn test_missing_contract_start_fails_for_the_employee() {
        let mut employee = create_test_employee();
        employee.contract_start = None;
        let err = compute(&employee, &period(), &PeriodOverrides::default(), &create_test_params())
            .unwrap_err();
        assert_eq!(err.employee_id(), Some("emp_001"));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_overflowing_overtime_is_an_employee_error() {
        let mut employee = create_test_employee();
        employee.base_salary = dec("1000000000000");
        let overrides = PeriodOverrides {
            overtime_hours_50: dec("100000000000000000000"),
            ..PeriodOverrides::default()
        };

        let err = compute(&employee, &period(), &overrides, &create_test_params()).unwrap_err();

        assert_eq!(err.employee_id(), Some("emp_001"));
        assert!(!err.is_configuration());
        assert!(matches!(
            err,
            EngineError::InvalidEmployee { ref field, .. } if field == "overtime_hours_50"
        ));
    }

    #[test]
    fn test_largest_accepted_figures_settle() {
        let mut employee = create_test_employee();
        employee.base_salary = dec("1000000000000");
        let overrides = PeriodOverrides {
            overtime_hours_50: dec("744"),
            overtime_hours_100: dec("744"),
            cash_advances: dec("1000000000000"),
            ..PeriodOverrides::default()
        };

        let result = compute(&employee, &period(), &overrides, &create_test_params()).unwrap();

        assert_eq!(
            result.totals.net_salary,
            result.totals.total_earnings - result.totals.total_discounts
        );
    }

    #[test]
    fn test_unknown_fund_is_configuration_error() {
        let mut employee = create_test_employee();
        employee.pension_fund = Some("Cuprum".to_string());
        let err = compute(&employee, &period(), &PeriodOverrides::default(), &create_test_params())
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_parameters_for_another_period_are_rejected() {
        let other = PayrollPeriod::new(2025, 2).unwrap();
        let err = compute(
            &create_test_employee(),
            &other,
            &PeriodOverrides::default(),
            &create_test_params(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::CalculationError { .. }));
    }

    #[test]
    fn test_audit_trace_is_sequential() {
        let result = compute(
            &create_test_employee(),
            &period(),
            &PeriodOverrides::default(),
            &create_test_params(),
        )
        .unwrap();

        let numbers: Vec<u32> = result.audit_trace.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, (1..=13).collect::<Vec<u32>>());
        assert_eq!(result.engine_version, ENGINE_VERSION);
    }

    #[test]
    fn test_cash_advance_larger_than_pay_warns() {
        let overrides = PeriodOverrides {
            cash_advances: dec("2000000"),
            ..PeriodOverrides::default()
        };
        let result = compute(
            &create_test_employee(),
            &period(),
            &overrides,
            &create_test_params(),
        )
        .unwrap();
        assert!(result.totals.net_salary < Decimal::ZERO);
        assert!(result
            .audit_trace
            .warnings
            .iter()
            .any(|w| w.code == "NEGATIVE_NET_SALARY"));
    }
}
