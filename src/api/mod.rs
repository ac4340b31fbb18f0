//! HTTP API for the payroll engine.
//!
//! Exposes payroll computation for one employee or a whole roster, and the
//! regulatory export, as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BatchRequest, CalculationRequest, ExportRequest};
pub use response::{ApiError, BatchResponse, ExportResponse, FailureBody};
pub use state::AppState;
