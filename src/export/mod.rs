//! Regulatory contribution export.
//!
//! Turns computed payroll results into the fixed-position, semicolon
//! separated file submitted to the social-security collection platform.
//! Each employee becomes one 105-field row; records that cannot be
//! exported are reported as [`ValidationError`]s instead of aborting the
//! batch.

mod builder;
mod codes;
mod movement;
mod row;
mod rut;
mod sections;

pub use builder::{CompanyInfo, ExportBatch, ValidationError, build_export};
pub use codes::{
    CompensationFund, HealthInstitution, OTHER_PROVIDER_CODE, PensionFund, WorkAccidentInsurer,
};
pub use movement::{MOVEMENT_DATE_FORMAT, Movement};
pub use row::{ExportField, ExportRow, FIELD_COUNT, FIELD_SEPARATOR, ROW_TERMINATOR, field};
pub use rut::{Rut, RutError, check_character, is_valid_rut};
pub use sections::{HealthSection, PensionSection};
