//! Observation intake and risk escalation.

use log::info;

use crate::db::{Database, DbError};
use crate::models::{
    Alert, AlertCategory, Observation, ObservationInput, Patient, RiskAssessment, RiskLevel, User,
};
use crate::risk::EscalationPolicy;

use super::follow_up::FollowUpManager;
use super::{CareError, CareResult};

/// Coordinates the full intake pipeline for one clinical check.
pub struct EscalationEngine<'a> {
    db: &'a Database,
    policy: EscalationPolicy,
    follow_ups: FollowUpManager<'a>,
}

impl<'a> EscalationEngine<'a> {
    /// Create an engine with the default escalation policy.
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            policy: EscalationPolicy::new(),
            follow_ups: FollowUpManager::new(db),
        }
    }

    /// Create an engine with a custom policy.
    pub fn with_policy(db: &'a Database, policy: EscalationPolicy) -> Self {
        Self {
            db,
            policy,
            follow_ups: FollowUpManager::new(db),
        }
    }

    /// Get the active policy.
    pub fn policy(&self) -> &EscalationPolicy {
        &self.policy
    }

    /// Record a clinical check end to end.
    ///
    /// Scores the observation, persists it together with the patient's
    /// refreshed risk snapshot, raises an alert when the classification
    /// warrants one, and schedules the follow-up call. Everything after
    /// validation happens in a single transaction.
    pub fn record_observation(
        &self,
        input: &ObservationInput,
        performed_by: &str,
    ) -> CareResult<Observation> {
        // Step 1: Resolve the patient and the performing staff member
        let patient = self
            .db
            .get_patient(&input.patient_id)?
            .ok_or_else(|| CareError::NotFound(format!("patient {}", input.patient_id)))?;
        let performer = self
            .db
            .get_user(performed_by)?
            .ok_or_else(|| CareError::NotFound(format!("user {}", performed_by)))?;

        // Step 2: Validate clinical ranges before anything is written
        input.validate().map_err(CareError::Validation)?;

        // Step 3: Fresh entry, or in-place correction of an existing one
        let mut observation = self.observation_to_write(input, &patient, &performer)?;
        input.apply_to(&mut observation);

        // Step 4: Score and classify
        let assessment = self.policy.assess(&observation, &patient);
        observation.risk_score = assessment.score();
        observation.risk_level = assessment.level();
        observation.risk_factors = if assessment.factors().is_empty() {
            None
        } else {
            Some(assessment.joined_factors())
        };

        let decision = self.policy.decide(
            assessment.level(),
            input.manual_follow_up.is_some(),
            input.auto_follow_up,
        );

        let tx = self.db.transaction()?;

        // Step 5: Persist the observation and refresh the patient snapshot
        self.db.upsert_observation(&observation)?;
        self.db
            .update_patient_risk(&patient.id, assessment.score(), assessment.level())?;

        // Step 6: Raise an alert for moderate and severe classifications
        if decision.raise_alert {
            let alert = build_risk_alert(&patient, &observation, &assessment);
            self.db.insert_alert(&alert)?;
            info!(
                "Raised {} risk alert {} for patient {}",
                assessment.level().label(),
                alert.id,
                patient.id
            );
        }

        // Step 7: Schedule the follow-up call, manual request first
        if let Some(manual) = &input.manual_follow_up {
            // Unresolvable assignees fall back to the performing user
            let assignee = match manual.assignee_id.as_deref() {
                Some(requested) => match self.db.get_user(requested)? {
                    Some(user) => user.id,
                    None => performer.id.clone(),
                },
                None => performer.id.clone(),
            };
            self.follow_ups.schedule(
                &patient.id,
                &assignee,
                manual.scheduled_date,
                manual.notes.clone(),
                Some(&observation.id),
            )?;
        } else if let Some(days) = decision.follow_up_in_days {
            let due = chrono::Utc::now().date_naive() + chrono::Duration::days(days);
            let note = format!(
                "Auto-scheduled follow-up for {} RISK patient. Risk factors: {}",
                assessment.level().label(),
                assessment.factors().join(", ")
            );
            self.follow_ups.schedule(
                &patient.id,
                &performer.id,
                due,
                Some(note),
                Some(&observation.id),
            )?;
        }

        tx.commit().map_err(DbError::from)?;

        info!(
            "Recorded observation {} for patient {}: score {} ({})",
            observation.id,
            patient.id,
            assessment.score(),
            assessment.level().label()
        );
        Ok(observation)
    }

    /// Get an observation by ID.
    pub fn observation(&self, id: &str) -> CareResult<Option<Observation>> {
        Ok(self.db.get_observation(id)?)
    }

    /// All observations for a patient, newest check first.
    pub fn observations_for_patient(&self, patient_id: &str) -> CareResult<Vec<Observation>> {
        Ok(self.db.list_observations_for_patient(patient_id)?)
    }

    /// The most recent observation for a patient.
    pub fn latest_observation(&self, patient_id: &str) -> CareResult<Option<Observation>> {
        Ok(self.db.latest_observation_for_patient(patient_id)?)
    }

    /// An input id pointing at an existing observation of the same
    /// patient selects that record for correction. Anything else gets a
    /// fresh entry.
    fn observation_to_write(
        &self,
        input: &ObservationInput,
        patient: &Patient,
        performer: &User,
    ) -> CareResult<Observation> {
        if let Some(id) = &input.id {
            if let Some(existing) = self.db.get_observation(id)? {
                if existing.patient_id == patient.id {
                    let mut corrected = existing;
                    corrected.performed_by = performer.id.clone();
                    return Ok(corrected);
                }
            }
        }
        Ok(Observation::new(patient.id.clone(), performer.id.clone()))
    }
}

fn build_risk_alert(
    patient: &Patient,
    observation: &Observation,
    assessment: &RiskAssessment,
) -> Alert {
    let (title, action) = match assessment.level() {
        RiskLevel::Severe => (
            "CRITICAL: High Risk Patient Detected",
            "Immediate medical attention required. Contact the patient and arrange a doctor consultation.",
        ),
        _ => (
            "ATTENTION: Moderate Risk Patient Detected",
            "Monitor closely and schedule an early clinic review.",
        ),
    };

    let mut alert = Alert::new(
        patient.id.clone(),
        AlertCategory::HighRiskDetected,
        assessment.level(),
        title.to_string(),
        format!(
            "Patient {} (Mother ID: {}) has been assessed as {} risk. Risk score: {}.",
            patient.name,
            patient.mother_id,
            assessment.level().label(),
            assessment.score()
        ),
    );
    alert.observation_id = Some(observation.id.clone());
    alert.risk_factors = observation.risk_factors.clone();
    alert.recommended_action = Some(action.to_string());
    alert
}
