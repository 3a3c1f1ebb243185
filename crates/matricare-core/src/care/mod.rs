//! Care coordination services.
//!
//! Pipeline: Observation Intake → Scoring → Alerting → Follow-Up Calls

mod alerts;
mod escalation;
mod follow_up;

pub use alerts::*;
pub use escalation::*;
pub use follow_up::*;

use thiserror::Error;

/// Care service errors.
#[derive(Error, Debug)]
pub enum CareError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),
}

pub type CareResult<T> = Result<T, CareError>;
