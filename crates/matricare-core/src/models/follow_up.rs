//! Follow-up task models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Follow-up task status.
///
/// `Pending` is initial. `Completed`, `NoAnswer` and `Cancelled` are
/// terminal for the task instance; `Rescheduled` keeps the same task
/// eligible for further transitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FollowUpStatus {
    /// Awaiting the scheduled call
    Pending,
    /// Call made and outcome recorded
    Completed,
    /// Call attempted, patient unreachable
    NoAnswer,
    /// Date moved; task continues
    Rescheduled,
    /// Cancelled by staff
    Cancelled,
}

impl FollowUpStatus {
    /// Terminal statuses admit no further call updates.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FollowUpStatus::Completed | FollowUpStatus::NoAnswer | FollowUpStatus::Cancelled
        )
    }
}

/// Outcome fields recorded when a follow-up call is made.
///
/// Only applied in full when the call completes; `notes` alone may
/// accompany any transition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FollowUpOutcome {
    /// How the patient reported feeling
    pub patient_condition: Option<String>,
    /// Symptoms reported during the call
    pub symptoms_reported: Option<String>,
    /// Whether the patient is taking prescribed medication
    pub medication_compliance: Option<bool>,
    /// Concerns the patient raised
    pub concerns_raised: Option<String>,
    /// Advice given by the caller
    pub advice_given: Option<String>,
    /// Caller judged a doctor consultation necessary
    pub requires_doctor_consultation: bool,
    /// Caller judged the situation urgent; raises a severe alert
    pub requires_immediate_attention: bool,
    /// Call duration in seconds
    pub call_duration_seconds: Option<i32>,
    /// When set on completion, spawns a chained pending follow-up
    pub next_follow_up_date: Option<NaiveDate>,
    /// Notes to store on the task
    pub notes: Option<String>,
}

/// A scheduled contact task for a patient, assigned to a staff member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowUp {
    /// Local UUID
    pub id: String,
    /// Patient to contact
    pub patient_id: String,
    /// Staff member responsible for the call
    pub assigned_to: String,
    /// Date the call is due
    pub scheduled_date: NaiveDate,
    /// Lifecycle status
    pub status: FollowUpStatus,
    /// Timestamp of the most recent call attempt
    pub call_attempted_at: Option<String>,
    /// Timestamp of the completing call
    pub call_completed_at: Option<String>,
    /// Duration of the completing call
    pub call_duration_seconds: Option<i32>,
    /// Number of call attempts made
    pub attempt_count: u32,
    /// Outcome: patient condition
    pub patient_condition: Option<String>,
    /// Outcome: symptoms reported
    pub symptoms_reported: Option<String>,
    /// Outcome: medication compliance
    pub medication_compliance: Option<bool>,
    /// Outcome: concerns raised
    pub concerns_raised: Option<String>,
    /// Outcome: advice given
    pub advice_given: Option<String>,
    /// Outcome: doctor consultation needed
    pub requires_doctor_consultation: bool,
    /// Outcome: urgent attention needed
    pub requires_immediate_attention: bool,
    /// Free-text notes
    pub notes: Option<String>,
    /// Photo reference attached by the caller
    pub photo_url: Option<String>,
    /// Chained follow-up date recorded on completion
    pub next_follow_up_date: Option<NaiveDate>,
    /// Observation that triggered this task, if any
    pub triggered_by_observation: Option<String>,
    /// Consultation that triggered this task, if any
    pub triggered_by_consultation: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl FollowUp {
    /// Create a pending follow-up.
    pub fn new(patient_id: String, assigned_to: String, scheduled_date: NaiveDate) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            assigned_to,
            scheduled_date,
            status: FollowUpStatus::Pending,
            call_attempted_at: None,
            call_completed_at: None,
            call_duration_seconds: None,
            attempt_count: 0,
            patient_condition: None,
            symptoms_reported: None,
            medication_compliance: None,
            concerns_raised: None,
            advice_given: None,
            requires_doctor_consultation: false,
            requires_immediate_attention: false,
            notes: None,
            photo_url: None,
            next_follow_up_date: None,
            triggered_by_observation: None,
            triggered_by_consultation: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// A task still awaiting a conclusive call.
    pub fn is_actionable(&self) -> bool {
        !self.status.is_terminal()
    }
}
