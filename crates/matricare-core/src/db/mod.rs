//! Database layer for matricare.

mod schema;
mod patients;
mod observations;
mod alerts;
mod follow_ups;
mod users;

pub use schema::*;
#[allow(unused_imports)]
pub use patients::*;
#[allow(unused_imports)]
pub use observations::*;
#[allow(unused_imports)]
pub use alerts::*;
#[allow(unused_imports)]
pub use follow_ups::*;
#[allow(unused_imports)]
pub use users::*;

use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

use crate::models::RiskLevel;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction scoped to this connection. Statements issued
    /// through the wrapper while it is open run inside it; dropping
    /// without commit rolls everything back.
    pub fn transaction(&self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }
}

// Conversions shared across the entity modules.

fn risk_level_to_string(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Stable => "stable",
        RiskLevel::Moderate => "moderate",
        RiskLevel::Severe => "severe",
    }
}

fn string_to_risk_level(s: &str) -> Result<RiskLevel, DbError> {
    match s {
        "stable" => Ok(RiskLevel::Stable),
        "moderate" => Ok(RiskLevel::Moderate),
        "severe" => Ok(RiskLevel::Severe),
        _ => Err(DbError::Constraint(format!("Unknown risk level: {}", s))),
    }
}

fn date_to_sql(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn sql_to_date(s: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DbError::Constraint(format!("Bad date '{}': {}", s, e)))
}

fn opt_date_to_sql(date: Option<NaiveDate>) -> Option<String> {
    date.map(date_to_sql)
}

fn opt_sql_to_date(s: Option<String>) -> Result<Option<NaiveDate>, DbError> {
    s.as_deref().map(sql_to_date).transpose()
}
