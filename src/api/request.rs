//! Request types for the payroll API.

use serde::{Deserialize, Serialize};

use crate::calculation::PayrollInput;
use crate::export::CompanyInfo;
use crate::models::{EmployeeSnapshot, PayrollPeriod, PayrollResult, PeriodOverrides};

/// Request body for `POST /payroll/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The employee master data.
    pub employee: EmployeeSnapshot,
    /// The month to compute.
    pub period: PayrollPeriod,
    /// Adjustments for the month.
    #[serde(default)]
    pub overrides: PeriodOverrides,
}

/// Request body for `POST /payroll/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// The month to compute.
    pub period: PayrollPeriod,
    /// The roster, each employee with its own overrides.
    pub employees: Vec<PayrollInput>,
}

/// Request body for `POST /export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    /// The employer.
    pub company: CompanyInfo,
    /// The month to export.
    pub period: PayrollPeriod,
    /// The roster.
    pub employees: Vec<EmployeeSnapshot>,
    /// Settlements already computed for the month.
    #[serde(default)]
    pub results: Vec<PayrollResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_deserialize_calculation_request() {
        let json = r#"{
            "employee": {
                "id": "emp_001",
                "national_id": "12.345.678-5",
                "first_names": "Ana",
                "paternal_surname": "Soto",
                "gender": "female",
                "contract_start": "2020-01-01",
                "base_salary": "1000000",
                "pension_regime": "afp",
                "pension_fund": "Habitat",
                "health_scheme": "fonasa"
            },
            "period": {"year": 2025, "month": 1},
            "overrides": {"absence_days": 2, "overtime_hours_50": "4"}
        }"#;

        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employee.id, "emp_001");
        assert_eq!(request.period, PayrollPeriod::new(2025, 1).unwrap());
        assert_eq!(request.overrides.absence_days, 2);
        assert_eq!(request.overrides.overtime_hours_50, Decimal::from(4));
    }

    #[test]
    fn test_overrides_are_optional() {
        let json = r#"{
            "employee": {
                "id": "emp_002",
                "national_id": "11111111-1",
                "first_names": "Juan",
                "paternal_surname": "Pérez",
                "gender": "male",
                "base_salary": "800000"
            },
            "period": {"year": 2025, "month": 2}
        }"#;

        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.overrides, PeriodOverrides::default());
    }

    #[test]
    fn test_deserialize_export_request_without_results() {
        let json = r#"{
            "company": {"rut": "76123456-0", "name": "Comercial Andes SpA"},
            "period": {"year": 2025, "month": 3},
            "employees": []
        }"#;

        let request: ExportRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.company.mutual_branch, 0);
        assert!(request.results.is_empty());
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        let json = r#"{"period": {"year": 2025, "month": 13}, "employees": []}"#;
        assert!(serde_json::from_str::<BatchRequest>(json).is_err());
    }
}
