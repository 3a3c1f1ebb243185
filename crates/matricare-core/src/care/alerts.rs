//! Alert acknowledgement and resolution workflows.

use crate::db::Database;
use crate::models::Alert;

use super::{CareError, CareResult};

/// Manages the staff workflows on raised alerts.
///
/// Acknowledgement records who has seen an alert; resolution closes it
/// out. The two are independent.
pub struct AlertManager<'a> {
    db: &'a Database,
}

impl<'a> AlertManager<'a> {
    /// Create a new alert manager.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Mark an alert as seen by a staff member.
    pub fn acknowledge(
        &self,
        alert_id: &str,
        user_id: &str,
        notes: Option<String>,
        action_taken: Option<String>,
    ) -> CareResult<Alert> {
        let mut alert = self.load(alert_id)?;
        self.db
            .get_user(user_id)?
            .ok_or_else(|| CareError::NotFound(format!("user {}", user_id)))?;

        alert.acknowledged = true;
        alert.acknowledged_by = Some(user_id.to_string());
        alert.acknowledged_at = Some(chrono::Utc::now().to_rfc3339());
        alert.acknowledgement_notes = notes;
        alert.action_taken = action_taken;
        self.persist(&alert)?;
        Ok(alert)
    }

    /// Amend the notes or recorded action on an acknowledged alert.
    /// Fields left as `None` keep their stored values.
    pub fn update_acknowledgement(
        &self,
        alert_id: &str,
        notes: Option<String>,
        action_taken: Option<String>,
    ) -> CareResult<Alert> {
        let mut alert = self.load(alert_id)?;
        if !alert.acknowledged {
            return Err(CareError::BusinessRule(format!(
                "alert {} has not been acknowledged",
                alert_id
            )));
        }
        if notes.is_some() {
            alert.acknowledgement_notes = notes;
        }
        if action_taken.is_some() {
            alert.action_taken = action_taken;
        }
        self.persist(&alert)?;
        Ok(alert)
    }

    /// Close out an alert. Works with or without prior acknowledgement.
    pub fn resolve(&self, alert_id: &str, notes: Option<String>) -> CareResult<Alert> {
        let mut alert = self.load(alert_id)?;
        alert.resolved = true;
        alert.resolved_at = Some(chrono::Utc::now().to_rfc3339());
        alert.resolution_notes = notes;
        self.persist(&alert)?;
        Ok(alert)
    }

    /// Get an alert by ID.
    pub fn get(&self, id: &str) -> CareResult<Option<Alert>> {
        Ok(self.db.get_alert(id)?)
    }

    /// All alerts for a patient, newest first.
    pub fn for_patient(&self, patient_id: &str) -> CareResult<Vec<Alert>> {
        Ok(self.db.list_alerts_for_patient(patient_id)?)
    }

    /// Alerts nobody has acknowledged yet, newest first.
    pub fn unacknowledged(&self) -> CareResult<Vec<Alert>> {
        Ok(self.db.list_unacknowledged_alerts()?)
    }

    /// A patient's alerts still awaiting resolution.
    pub fn unresolved_for_patient(&self, patient_id: &str) -> CareResult<Vec<Alert>> {
        Ok(self.db.list_unresolved_alerts_for_patient(patient_id)?)
    }

    fn load(&self, id: &str) -> CareResult<Alert> {
        self.db
            .get_alert(id)?
            .ok_or_else(|| CareError::NotFound(format!("alert {}", id)))
    }

    fn persist(&self, alert: &Alert) -> CareResult<()> {
        if !self.db.update_alert_workflow(alert)? {
            return Err(CareError::NotFound(format!("alert {}", alert.id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertCategory, Patient, RiskLevel, StaffRole, User};

    fn setup() -> (Database, String, String) {
        let db = Database::open_in_memory().unwrap();
        let officer = User::new("Priya".into(), StaffRole::MedicalOfficer);
        db.insert_user(&officer).unwrap();
        let patient = Patient::new("MR-4001".into(), "Lakshmi".into(), 24);
        db.insert_patient(&patient).unwrap();

        let alert = Alert::new(
            patient.id.clone(),
            AlertCategory::HighRiskDetected,
            RiskLevel::Severe,
            "CRITICAL: High Risk Patient Detected".into(),
            "Patient Lakshmi (Mother ID: MR-4001) has been assessed as SEVERE risk. Risk score: 9.".into(),
        );
        db.insert_alert(&alert).unwrap();
        (db, alert.id, officer.id)
    }

    #[test]
    fn test_acknowledge_stamps_user_and_time() {
        let (db, alert_id, officer_id) = setup();
        let manager = AlertManager::new(&db);

        let acked = manager
            .acknowledge(&alert_id, &officer_id, Some("seen".into()), Some("called patient".into()))
            .unwrap();
        assert!(acked.acknowledged);
        assert_eq!(acked.acknowledged_by, Some(officer_id));
        assert!(acked.acknowledged_at.is_some());
        assert!(!acked.resolved);

        assert!(manager.unacknowledged().unwrap().is_empty());
    }

    #[test]
    fn test_acknowledge_requires_known_user() {
        let (db, alert_id, _) = setup();
        let manager = AlertManager::new(&db);
        assert!(matches!(
            manager.acknowledge(&alert_id, "ghost", None, None),
            Err(CareError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_acknowledgement_requires_prior_ack() {
        let (db, alert_id, officer_id) = setup();
        let manager = AlertManager::new(&db);

        assert!(matches!(
            manager.update_acknowledgement(&alert_id, Some("late note".into()), None),
            Err(CareError::BusinessRule(_))
        ));

        manager
            .acknowledge(&alert_id, &officer_id, Some("first".into()), Some("called".into()))
            .unwrap();
        let amended = manager
            .update_acknowledgement(&alert_id, Some("second".into()), None)
            .unwrap();
        assert_eq!(amended.acknowledgement_notes, Some("second".into()));
        // Untouched field keeps its value
        assert_eq!(amended.action_taken, Some("called".into()));
    }

    #[test]
    fn test_resolve_is_independent_of_acknowledgement() {
        let (db, alert_id, _) = setup();
        let manager = AlertManager::new(&db);

        let resolved = manager.resolve(&alert_id, Some("referred to PHC".into())).unwrap();
        assert!(resolved.resolved);
        assert!(!resolved.acknowledged);
        assert!(resolved.resolved_at.is_some());

        let stored = manager.get(&alert_id).unwrap().unwrap();
        assert_eq!(stored.resolution_notes, Some("referred to PHC".into()));
        assert!(manager.unresolved_for_patient(&stored.patient_id).unwrap().is_empty());
        // Still surfaces in the unacknowledged queue
        assert_eq!(manager.unacknowledged().unwrap().len(), 1);
    }

    #[test]
    fn test_workflow_on_missing_alert() {
        let (db, _, officer_id) = setup();
        let manager = AlertManager::new(&db);
        assert!(matches!(
            manager.acknowledge("ghost", &officer_id, None, None),
            Err(CareError::NotFound(_))
        ));
        assert!(matches!(manager.resolve("ghost", None), Err(CareError::NotFound(_))));
    }
}
