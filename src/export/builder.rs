//! Export batch assembly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::codes::{CompensationFund, WorkAccidentInsurer};
use super::movement::Movement;
use super::row::{ExportRow, ROW_TERMINATOR, field};
use super::rut::Rut;
use super::sections::{HealthSection, PensionSection};
use crate::models::{
    DiscountConcept, EarningConcept, EmployeeSnapshot, Gender, HealthScheme, Nationality,
    PayrollPeriod, PayrollResult,
};

/// Payment type for the month's regular remuneration.
const PAYMENT_TYPE_REGULAR: &str = "01";

/// Line type of a main (non-supplementary) line.
const LINE_TYPE_MAIN: &str = "00";

/// Worker type of an active employee.
const WORKER_TYPE_ACTIVE: u8 = 0;

/// Bracket reported when no family allowance applies.
const NO_FAMILY_BRACKET: &str = "D";

/// Employer data shared by every row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// Company RUT.
    pub rut: String,
    /// Legal name.
    pub name: String,
    /// Family compensation fund the company is affiliated to, if any.
    #[serde(default)]
    pub compensation_fund: Option<String>,
    /// Work-accident insurer, if any.
    #[serde(default)]
    pub work_accident_insurer: Option<String>,
    /// Branch number registered with the insurer.
    #[serde(default)]
    pub mutual_branch: u32,
    /// Cost center written on every row.
    #[serde(default)]
    pub cost_center: Option<String>,
}

/// A record-level problem that kept an employee out of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{employee_id}: {field_name}: {message}")]
pub struct ValidationError {
    /// The employee the error belongs to.
    pub employee_id: String,
    /// 1-based field position, when the error concerns one field.
    pub field_number: Option<u16>,
    /// Name of the offending field or record.
    pub field_name: String,
    /// What is wrong.
    pub message: String,
}

/// Valid rows and errors produced by one export run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportBatch {
    /// The period exported.
    pub period: Option<PayrollPeriod>,
    /// One row per valid employee.
    pub rows: Vec<ExportRow>,
    /// One entry per skipped employee.
    pub errors: Vec<ValidationError>,
}

impl ExportBatch {
    /// Serializes the rows: fields joined by `;`, each row terminated by
    /// CRLF. An empty batch serializes to an empty string.
    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.to_line() + ROW_TERMINATOR)
            .collect()
    }
}

fn master_data_missing(employee: &EmployeeSnapshot) -> Vec<&'static str> {
    let blank = |value: &Option<String>| value.as_deref().is_none_or(|v| v.trim().is_empty());

    let mut missing = Vec::new();
    match employee.pension_regime {
        None => missing.push("pension regime"),
        Some(regime) if regime.requires_fund() && blank(&employee.pension_fund) => {
            missing.push("pension fund")
        }
        Some(_) => {}
    }
    match employee.health_scheme {
        None => missing.push("health scheme"),
        Some(HealthScheme::Isapre) if blank(&employee.isapre) => missing.push("isapre"),
        Some(_) => {}
    }
    missing
}

fn period_text(period: &PayrollPeriod) -> String {
    format!("{:02}{}", period.month(), period.year())
}

/// Builds one employee's row, or the reason it cannot be built.
fn build_row(
    company: &CompanyInfo,
    employee: &EmployeeSnapshot,
    results: &[PayrollResult],
    period: &PayrollPeriod,
) -> Result<ExportRow, ValidationError> {
    let error = |field_number: Option<u16>, field_name: &str, message: String| ValidationError {
        employee_id: employee.id.clone(),
        field_number,
        field_name: field_name.to_string(),
        message,
    };

    let rut = Rut::parse(&employee.national_id)
        .map_err(|e| error(Some(field::RUT as u16), "rut", e.to_string()))?;

    if employee.contract_start.is_none() {
        return Err(error(
            None,
            "contract_start",
            "missing contract start date".to_string(),
        ));
    }

    let result = results
        .iter()
        .find(|r| r.employee_id == employee.id && r.period == *period)
        .ok_or_else(|| {
            error(
                None,
                "payroll_result",
                format!("no payroll result computed for {}", period),
            )
        })?;

    let missing = master_data_missing(employee);
    let (Some(regime), Some(scheme), true) = (
        employee.pension_regime,
        employee.health_scheme,
        missing.is_empty(),
    ) else {
        return Err(error(
            None,
            "master_data",
            format!("missing required fields: {}", missing.join(", ")),
        ));
    };

    let mut row = ExportRow::new(employee.id.clone());

    // Identity
    row.set(field::RUT, rut.number().to_string());
    row.set(field::RUT_CHECK, rut.check().to_string());
    row.set(field::PATERNAL_SURNAME, employee.paternal_surname.trim());
    row.set(field::MATERNAL_SURNAME, employee.maternal_surname.trim());
    row.set(field::NAMES, employee.first_names.trim());
    row.set(
        field::GENDER,
        match employee.gender {
            Gender::Male => "M",
            Gender::Female => "F",
        },
    );
    row.set(
        field::NATIONALITY,
        match employee.nationality {
            Nationality::Chilean => 0u8,
            Nationality::Foreign => 1u8,
        },
    );

    // Period and movement
    row.set(field::PAYMENT_TYPE, PAYMENT_TYPE_REGULAR);
    row.set(field::PERIOD_FROM, period_text(period));
    row.set(field::PERIOD_TO, period_text(period));
    row.set(field::WORKER_TYPE, WORKER_TYPE_ACTIVE);
    row.set(field::WORKED_DAYS, result.worked_days);
    row.set(field::LINE_TYPE, LINE_TYPE_MAIN);
    let movement = Movement::derive(employee.contract_start, employee.contract_end, period);
    row.set(field::MOVEMENT_CODE, movement.code());
    row.set(field::MOVEMENT_FROM, movement.start_text());
    row.set(field::MOVEMENT_TO, movement.end_text());

    // Family allowance
    row.set(
        field::FAMILY_BRACKET,
        result
            .family_allowance_bracket
            .as_deref()
            .unwrap_or(NO_FAMILY_BRACKET),
    );
    row.set(field::DEPENDENTS, employee.dependents);
    row.set(
        field::FAMILY_AMOUNT,
        result.earning_amount(EarningConcept::FamilyAllowance),
    );

    // Pension and health
    let pension = PensionSection::for_employee(regime, employee, result);
    pension.apply(&mut row);
    HealthSection::for_employee(scheme, employee, result).apply(&mut row);

    // Voluntary savings
    let savings = result.discount_amount(DiscountConcept::VoluntarySavingsPreTax)
        + result.discount_amount(DiscountConcept::VoluntarySavingsPostTax);
    if !savings.is_zero() {
        if let PensionSection::Afp { code, .. } = pension {
            row.set(field::APV_INSTITUTION, code);
        }
        row.set(field::APV_AMOUNT, savings);
    }

    // Compensation fund and work-accident insurer
    let ccaf = CompensationFund::from_name(company.compensation_fund.as_deref());
    row.set(field::CCAF_CODE, ccaf.code());
    if ccaf != CompensationFund::Unaffiliated {
        row.set(field::CCAF_BASE, result.bases.pension);
    }
    let mutual = WorkAccidentInsurer::from_name(company.work_accident_insurer.as_deref());
    row.set(field::MUTUAL_CODE, mutual.code());
    if mutual != WorkAccidentInsurer::Isl {
        row.set(field::MUTUAL_BASE, result.bases.pension);
        row.set(field::MUTUAL_BRANCH, company.mutual_branch);
    }

    // Unemployment insurance
    row.set(field::AFC_BASE, result.bases.unemployment);
    row.set(
        field::AFC_EMPLOYEE,
        result.discount_amount(DiscountConcept::Unemployment),
    );

    if let Some(cost_center) = company.cost_center.as_deref() {
        row.set(field::COST_CENTER, cost_center.trim());
    }

    Ok(row)
}

/// Builds the export batch for a period.
///
/// Every employee whose contract overlaps the period, or who has no
/// contract start to tell, is either written as a row or reported as a
/// [`ValidationError`]; a bad record never stops the batch. Rows and errors
/// keep the order of `employees`.
pub fn build_export(
    company: &CompanyInfo,
    employees: &[EmployeeSnapshot],
    results: &[PayrollResult],
    period: &PayrollPeriod,
) -> ExportBatch {
    let (first, last) = (period.first_day(), period.last_day());

    let batch = employees
        .iter()
        .filter(|employee| {
            employee.contract_start.is_none() || employee.contract_overlaps(first, last)
        })
        .fold(
            ExportBatch {
                period: Some(*period),
                ..ExportBatch::default()
            },
            |mut batch, employee| {
                match build_row(company, employee, results, period) {
                    Ok(row) => batch.rows.push(row),
                    Err(error) => {
                        tracing::warn!(
                            employee_id = %error.employee_id,
                            name = %employee.full_name(),
                            field = %error.field_name,
                            message = %error.message,
                            "Employee skipped in export"
                        );
                        batch.errors.push(error);
                    }
                }
                batch
            },
        );

    tracing::info!(
        company = %company.name,
        period = %period,
        rows = batch.rows.len(),
        errors = batch.errors.len(),
        "Export batch built"
    );

    batch
}
