//! Payroll computation and regulatory export for Chilean payroll.
//!
//! Given an employee snapshot, a month, the month's adjustments and the
//! regulatory parameters published for it, the engine computes an itemized
//! settlement with an audit trace. Settlements for a roster are then turned
//! into the fixed-position contribution file submitted each month.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::calculation::compute;
//! use payroll_engine::config::{ConfigLoader, resolve_period};
//! use payroll_engine::models::{EmployeeSnapshot, PayrollPeriod, PeriodOverrides};
//!
//! let loader = ConfigLoader::load("./config/cl")?;
//! let period = PayrollPeriod::new(2025, 1)?;
//! let params = resolve_period(&loader, period)?;
//!
//! let employee: EmployeeSnapshot = serde_json::from_str(r#"{
//!     "id": "emp_001",
//!     "national_id": "12.345.678-5",
//!     "first_names": "Ana",
//!     "paternal_surname": "Soto",
//!     "gender": "female",
//!     "contract_start": "2020-01-01",
//!     "base_salary": "1000000",
//!     "pension_regime": "afp",
//!     "pension_fund": "Habitat",
//!     "health_scheme": "fonasa"
//! }"#).unwrap();
//!
//! let result = compute(&employee, &period, &PeriodOverrides::default(), &params)?;
//! println!("Net salary: {}", result.totals.net_salary);
//! # Ok::<(), payroll_engine::error::EngineError>(())
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
