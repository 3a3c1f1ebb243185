//! Follow-up call lifecycle.

use chrono::NaiveDate;
use log::{info, warn};

use crate::db::{Database, DbError};
use crate::models::{
    Alert, AlertCategory, FollowUp, FollowUpOutcome, FollowUpStatus, RiskLevel, StaffRole,
};

use super::{CareError, CareResult};

/// Manages follow-up call tasks from scheduling through completion.
pub struct FollowUpManager<'a> {
    db: &'a Database,
}

impl<'a> FollowUpManager<'a> {
    /// Create a new follow-up manager.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Schedule a follow-up call for a patient.
    pub fn schedule(
        &self,
        patient_id: &str,
        assigned_to: &str,
        scheduled_date: NaiveDate,
        notes: Option<String>,
        triggered_by_observation: Option<&str>,
    ) -> CareResult<FollowUp> {
        self.db
            .get_patient(patient_id)?
            .ok_or_else(|| CareError::NotFound(format!("patient {}", patient_id)))?;
        self.db
            .get_user(assigned_to)?
            .ok_or_else(|| CareError::NotFound(format!("user {}", assigned_to)))?;

        let mut task =
            FollowUp::new(patient_id.to_string(), assigned_to.to_string(), scheduled_date);
        task.notes = notes;
        task.triggered_by_observation = triggered_by_observation.map(String::from);
        self.db.insert_follow_up(&task)?;

        info!(
            "Scheduled follow-up {} for patient {} on {}",
            task.id, patient_id, scheduled_date
        );
        Ok(task)
    }

    /// Schedule a follow-up after a doctor consultation, assigned to the
    /// first active help desk user.
    ///
    /// Returns `None` without creating anything when no help desk user
    /// is available.
    pub fn schedule_from_consultation(
        &self,
        patient_id: &str,
        consultation_id: &str,
        scheduled_date: NaiveDate,
        notes: Option<String>,
    ) -> CareResult<Option<FollowUp>> {
        self.db
            .get_patient(patient_id)?
            .ok_or_else(|| CareError::NotFound(format!("patient {}", patient_id)))?;

        let help_desk = self.db.find_active_users_by_role(StaffRole::HelpDesk)?;
        let assignee = match help_desk.first() {
            Some(user) => user,
            None => {
                warn!(
                    "No active help desk user; skipping follow-up for consultation {}",
                    consultation_id
                );
                return Ok(None);
            }
        };

        let mut task =
            FollowUp::new(patient_id.to_string(), assignee.id.clone(), scheduled_date);
        task.notes = notes;
        task.triggered_by_consultation = Some(consultation_id.to_string());
        self.db.insert_follow_up(&task)?;
        Ok(Some(task))
    }

    /// Record a call attempt against a task.
    ///
    /// Legal only while the task is pending or rescheduled. Every update
    /// stamps the attempt and increments the attempt count. A completed
    /// call additionally persists the full outcome, raises an urgent
    /// alert when the caller flags immediate attention, and chains the
    /// next pending task when a next date was agreed. All effects of one
    /// update are atomic.
    pub fn update(
        &self,
        id: &str,
        status: FollowUpStatus,
        outcome: &FollowUpOutcome,
    ) -> CareResult<FollowUp> {
        let mut task = self.load(id)?;

        if task.status.is_terminal() {
            return Err(CareError::BusinessRule(format!(
                "follow-up {} is {:?}; call updates allowed only while pending or rescheduled",
                id, task.status
            )));
        }

        let now = chrono::Utc::now().to_rfc3339();
        task.call_attempted_at = Some(now.clone());
        task.attempt_count += 1;
        task.status = status;
        if let Some(notes) = &outcome.notes {
            task.notes = Some(notes.clone());
        }

        if status == FollowUpStatus::Completed {
            task.call_completed_at = Some(now);
            task.call_duration_seconds = outcome.call_duration_seconds;
            task.patient_condition = outcome.patient_condition.clone();
            task.symptoms_reported = outcome.symptoms_reported.clone();
            task.medication_compliance = outcome.medication_compliance;
            task.concerns_raised = outcome.concerns_raised.clone();
            task.advice_given = outcome.advice_given.clone();
            task.requires_doctor_consultation = outcome.requires_doctor_consultation;
            task.requires_immediate_attention = outcome.requires_immediate_attention;
            task.next_follow_up_date = outcome.next_follow_up_date;
        }

        let tx = self.db.transaction()?;

        self.persist(&task)?;

        if status == FollowUpStatus::Completed {
            if task.requires_immediate_attention {
                let alert = self.complication_alert(&task)?;
                self.db.insert_alert(&alert)?;
                warn!(
                    "Follow-up {} flagged immediate attention for patient {}",
                    task.id, task.patient_id
                );
            }
            if let Some(next_date) = task.next_follow_up_date {
                let mut next =
                    FollowUp::new(task.patient_id.clone(), task.assigned_to.clone(), next_date);
                next.notes = Some(format!(
                    "Follow-up from previous call on {}",
                    task.scheduled_date
                ));
                self.db.insert_follow_up(&next)?;
            }
        }

        tx.commit().map_err(DbError::from)?;

        info!(
            "Follow-up {} updated to {:?} (attempt {})",
            task.id, task.status, task.attempt_count
        );
        Ok(task)
    }

    /// Move a task to a new date. Completed calls cannot be rescheduled.
    pub fn reschedule(&self, id: &str, new_date: NaiveDate) -> CareResult<FollowUp> {
        let mut task = self.load(id)?;
        if task.status == FollowUpStatus::Completed {
            return Err(CareError::BusinessRule(format!(
                "follow-up {} is already completed and cannot be rescheduled",
                id
            )));
        }
        task.scheduled_date = new_date;
        task.status = FollowUpStatus::Rescheduled;
        self.persist(&task)?;
        Ok(task)
    }

    /// Hand a task to a different staff member. Allowed in any status.
    pub fn reassign(&self, id: &str, user_id: &str) -> CareResult<FollowUp> {
        let mut task = self.load(id)?;
        self.db
            .get_user(user_id)?
            .ok_or_else(|| CareError::NotFound(format!("user {}", user_id)))?;
        task.assigned_to = user_id.to_string();
        self.persist(&task)?;
        Ok(task)
    }

    /// Cancel a task. Completed calls cannot be cancelled.
    pub fn cancel(&self, id: &str) -> CareResult<FollowUp> {
        let mut task = self.load(id)?;
        if task.status == FollowUpStatus::Completed {
            return Err(CareError::BusinessRule(format!(
                "follow-up {} is already completed and cannot be cancelled",
                id
            )));
        }
        task.status = FollowUpStatus::Cancelled;
        self.persist(&task)?;
        Ok(task)
    }

    /// Store a photo reference on a task.
    pub fn attach_photo(&self, id: &str, url: &str) -> CareResult<FollowUp> {
        let mut task = self.load(id)?;
        task.photo_url = Some(url.to_string());
        self.persist(&task)?;
        Ok(task)
    }

    /// Get a follow-up by ID.
    pub fn get(&self, id: &str) -> CareResult<Option<FollowUp>> {
        Ok(self.db.get_follow_up(id)?)
    }

    /// All follow-ups for a patient, earliest scheduled first.
    pub fn for_patient(&self, patient_id: &str) -> CareResult<Vec<FollowUp>> {
        Ok(self.db.list_follow_ups_for_patient(patient_id)?)
    }

    /// All follow-ups assigned to a staff member.
    pub fn for_assignee(&self, user_id: &str) -> CareResult<Vec<FollowUp>> {
        Ok(self.db.list_follow_ups_for_assignee(user_id)?)
    }

    /// Actionable follow-ups due on a date.
    pub fn due_on(&self, date: NaiveDate) -> CareResult<Vec<FollowUp>> {
        Ok(self.db.list_follow_ups_due_on(date)?)
    }

    /// Actionable follow-ups scheduled before a date.
    pub fn overdue(&self, as_of: NaiveDate) -> CareResult<Vec<FollowUp>> {
        Ok(self.db.list_overdue_follow_ups(as_of)?)
    }

    fn load(&self, id: &str) -> CareResult<FollowUp> {
        self.db
            .get_follow_up(id)?
            .ok_or_else(|| CareError::NotFound(format!("follow-up {}", id)))
    }

    fn persist(&self, task: &FollowUp) -> CareResult<()> {
        if !self.db.update_follow_up(task)? {
            return Err(CareError::NotFound(format!("follow-up {}", task.id)));
        }
        Ok(())
    }

    fn complication_alert(&self, task: &FollowUp) -> CareResult<Alert> {
        let patient = self
            .db
            .get_patient(&task.patient_id)?
            .ok_or_else(|| CareError::NotFound(format!("patient {}", task.patient_id)))?;

        let mut description = format!(
            "Follow-up call for patient {} (Mother ID: {}) reported a condition requiring immediate attention.",
            patient.name, patient.mother_id
        );
        if let Some(symptoms) = &task.symptoms_reported {
            description.push_str(&format!(" Symptoms: {}", symptoms));
        }

        let mut alert = Alert::new(
            task.patient_id.clone(),
            AlertCategory::ComplicationReported,
            RiskLevel::Severe,
            "URGENT: Patient Requires Immediate Attention".to_string(),
            description,
        );
        alert.recommended_action = Some(
            "Contact the patient immediately and arrange an urgent doctor consultation."
                .to_string(),
        );
        Ok(alert)
    }
}
