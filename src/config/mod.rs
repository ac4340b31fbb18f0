//! Regulatory parameter loading and resolution.
//!
//! Parameters are keyed by period (year, month). A [`ParameterSource`]
//! exposes the raw pieces; [`resolve_period`] and [`resolve`] turn them into
//! one read-only [`RegulatoryParameters`] snapshot, resolved once per period
//! and shared by every employee computed in it.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::{ConfigLoader, resolve};
//! use payroll_engine::models::PayrollPeriod;
//!
//! let loader = ConfigLoader::load("./config/cl").unwrap();
//! let period = PayrollPeriod::new(2025, 1).unwrap();
//! let params = resolve(&loader, period, Some("Habitat")).unwrap();
//! println!("Pension cap: {}", params.pension_cap_amount());
//! ```

mod loader;
mod resolver;
mod types;

pub use loader::ConfigLoader;
pub use resolver::{GRATIFICATION_CAP_MINIMUM_WAGES, ParameterSource, resolve, resolve_period};
pub use types::{
    FamilyAllowanceBracket, IndicatorSet, ParameterSetMetadata, PeriodParameterFile, RawNumber,
    RegulatoryParameters, TaxBracket, TaxableCaps,
};
