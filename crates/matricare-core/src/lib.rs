//! Matricare Core Library
//!
//! Risk assessment and care escalation engine for community maternal
//! health programs.
//!
//! # Architecture
//!
//! ```text
//! Vitals + Labs + Danger Signs → Validation → Scoring → Classification
//!                                                            │
//!                             [observations + patient risk snapshot]
//!                                                            │
//!                                                   Escalation Policy
//!                                                            │
//!                                     ┌──────────────────────┴──────────┐
//!                                     │                                 │
//!                                     ▼                                 ▼
//!                             Alert (moderate+)                 Follow-Up Call
//!                            acknowledge/resolve               (manual or auto)
//!                                     ▲                                 │
//!                                     └── immediate attention ── call outcome
//!                                                                       │
//!                                                               chained next call
//! ```
//!
//! # Core Principle
//!
//! **No qualifying risk goes unescalated.** The alert and the follow-up
//! call are written in the same transaction as the observation; a severe
//! patient is never silently recorded.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (Patient, Observation, Alert, FollowUp, etc.)
//! - [`risk`]: Pure scoring rules and the escalation policy
//! - [`care`]: Coordination services (intake, follow-up calls, alert workflows)

pub mod care;
pub mod db;
pub mod models;
pub mod risk;

// Re-export commonly used types
pub use care::{AlertManager, CareError, CareResult, EscalationEngine, FollowUpManager};
pub use db::Database;
pub use models::{
    Alert, AlertCategory, FollowUp, FollowUpOutcome, FollowUpStatus, ManualFollowUp, Observation,
    ObservationInput, Patient, RiskAssessment, RiskLevel, StaffRole, User,
};
pub use risk::{EscalationConfig, EscalationDecision, EscalationPolicy};
