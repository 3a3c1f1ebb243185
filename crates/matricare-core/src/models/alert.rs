//! Risk alert models.

use serde::{Deserialize, Serialize};

use super::RiskLevel;

/// What raised an alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AlertCategory {
    /// A scored observation crossed the escalation threshold
    HighRiskDetected,
    /// A completed follow-up call reported a complication
    ComplicationReported,
}

/// A durable, staff-actionable alert. Append-only: qualifying events
/// always create a new alert, never overwrite a prior one.
///
/// Acknowledgement and resolution are independent workflows; an alert
/// may be resolved without ever being acknowledged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    /// Local UUID
    pub id: String,
    /// Patient the alert concerns
    pub patient_id: String,
    /// Observation that triggered the alert, when raised by scoring
    pub observation_id: Option<String>,
    /// What raised the alert
    pub category: AlertCategory,
    /// Severity, mirroring the triggering classification
    pub severity: RiskLevel,
    /// Short headline shown to staff
    pub title: String,
    /// Full rationale naming the patient and score
    pub description: String,
    /// Triggered risk factors, semicolon-joined
    pub risk_factors: Option<String>,
    /// Suggested next step for staff
    pub recommended_action: Option<String>,
    /// Acknowledgement workflow
    pub acknowledged: bool,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<String>,
    pub acknowledgement_notes: Option<String>,
    pub action_taken: Option<String>,
    /// Resolution workflow
    pub resolved: bool,
    pub resolved_at: Option<String>,
    pub resolution_notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Alert {
    /// Create an unacknowledged, unresolved alert.
    pub fn new(
        patient_id: String,
        category: AlertCategory,
        severity: RiskLevel,
        title: String,
        description: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            observation_id: None,
            category,
            severity,
            title,
            description,
            risk_factors: None,
            recommended_action: None,
            acknowledged: false,
            acknowledged_by: None,
            acknowledged_at: None,
            acknowledgement_notes: None,
            action_taken: None,
            resolved: false,
            resolved_at: None,
            resolution_notes: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// An alert still awaiting resolution.
    pub fn is_open(&self) -> bool {
        !self.resolved
    }
}
