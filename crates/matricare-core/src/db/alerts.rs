//! Alert database operations.

use rusqlite::{params, OptionalExtension};

use super::{risk_level_to_string, string_to_risk_level, Database, DbError, DbResult};
use crate::models::{Alert, AlertCategory};

const ALERT_COLUMNS: &str = "id, patient_id, observation_id, category, severity, title, \
     description, risk_factors, recommended_action, acknowledged, acknowledged_by, \
     acknowledged_at, acknowledgement_notes, action_taken, resolved, resolved_at, \
     resolution_notes, created_at";

impl Database {
    /// Insert a new alert. Alerts are append-only; there is no upsert.
    pub fn insert_alert(&self, alert: &Alert) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO alerts (
                id, patient_id, observation_id, category, severity, title, description,
                risk_factors, recommended_action, acknowledged, acknowledged_by,
                acknowledged_at, acknowledgement_notes, action_taken, resolved,
                resolved_at, resolution_notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
            "#,
            params![
                alert.id,
                alert.patient_id,
                alert.observation_id,
                category_to_string(alert.category),
                risk_level_to_string(alert.severity),
                alert.title,
                alert.description,
                alert.risk_factors,
                alert.recommended_action,
                alert.acknowledged,
                alert.acknowledged_by,
                alert.acknowledged_at,
                alert.acknowledgement_notes,
                alert.action_taken,
                alert.resolved,
                alert.resolved_at,
                alert.resolution_notes,
                alert.created_at,
            ],
        )?;
        Ok(())
    }

    /// Persist the mutable workflow fields of an alert.
    pub fn update_alert_workflow(&self, alert: &Alert) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE alerts SET
                acknowledged = ?2,
                acknowledged_by = ?3,
                acknowledged_at = ?4,
                acknowledgement_notes = ?5,
                action_taken = ?6,
                resolved = ?7,
                resolved_at = ?8,
                resolution_notes = ?9
            WHERE id = ?1
            "#,
            params![
                alert.id,
                alert.acknowledged,
                alert.acknowledged_by,
                alert.acknowledged_at,
                alert.acknowledgement_notes,
                alert.action_taken,
                alert.resolved,
                alert.resolved_at,
                alert.resolution_notes,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get an alert by ID.
    pub fn get_alert(&self, id: &str) -> DbResult<Option<Alert>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM alerts WHERE id = ?", ALERT_COLUMNS),
                [id],
                map_alert_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a patient's alerts, newest first.
    pub fn list_alerts_for_patient(&self, patient_id: &str) -> DbResult<Vec<Alert>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM alerts WHERE patient_id = ? ORDER BY created_at DESC",
            ALERT_COLUMNS
        ))?;

        let rows = stmt.query_map([patient_id], map_alert_row)?;

        let mut alerts = Vec::new();
        for row in rows {
            alerts.push(row?.try_into()?);
        }
        Ok(alerts)
    }

    /// List alerts no one has acknowledged yet, newest first.
    pub fn list_unacknowledged_alerts(&self) -> DbResult<Vec<Alert>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM alerts WHERE acknowledged = 0 ORDER BY created_at DESC",
            ALERT_COLUMNS
        ))?;

        let rows = stmt.query_map([], map_alert_row)?;

        let mut alerts = Vec::new();
        for row in rows {
            alerts.push(row?.try_into()?);
        }
        Ok(alerts)
    }

    /// List a patient's alerts still awaiting resolution, newest first.
    pub fn list_unresolved_alerts_for_patient(&self, patient_id: &str) -> DbResult<Vec<Alert>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM alerts WHERE patient_id = ? AND resolved = 0 ORDER BY created_at DESC",
            ALERT_COLUMNS
        ))?;

        let rows = stmt.query_map([patient_id], map_alert_row)?;

        let mut alerts = Vec::new();
        for row in rows {
            alerts.push(row?.try_into()?);
        }
        Ok(alerts)
    }
}

/// Intermediate row struct for database mapping.
struct AlertRow {
    id: String,
    patient_id: String,
    observation_id: Option<String>,
    category: String,
    severity: String,
    title: String,
    description: String,
    risk_factors: Option<String>,
    recommended_action: Option<String>,
    acknowledged: bool,
    acknowledged_by: Option<String>,
    acknowledged_at: Option<String>,
    acknowledgement_notes: Option<String>,
    action_taken: Option<String>,
    resolved: bool,
    resolved_at: Option<String>,
    resolution_notes: Option<String>,
    created_at: String,
}

fn map_alert_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AlertRow> {
    Ok(AlertRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        observation_id: row.get(2)?,
        category: row.get(3)?,
        severity: row.get(4)?,
        title: row.get(5)?,
        description: row.get(6)?,
        risk_factors: row.get(7)?,
        recommended_action: row.get(8)?,
        acknowledged: row.get(9)?,
        acknowledged_by: row.get(10)?,
        acknowledged_at: row.get(11)?,
        acknowledgement_notes: row.get(12)?,
        action_taken: row.get(13)?,
        resolved: row.get(14)?,
        resolved_at: row.get(15)?,
        resolution_notes: row.get(16)?,
        created_at: row.get(17)?,
    })
}

impl TryFrom<AlertRow> for Alert {
    type Error = DbError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        Ok(Alert {
            id: row.id,
            patient_id: row.patient_id,
            observation_id: row.observation_id,
            category: string_to_category(&row.category)?,
            severity: string_to_risk_level(&row.severity)?,
            title: row.title,
            description: row.description,
            risk_factors: row.risk_factors,
            recommended_action: row.recommended_action,
            acknowledged: row.acknowledged,
            acknowledged_by: row.acknowledged_by,
            acknowledged_at: row.acknowledged_at,
            acknowledgement_notes: row.acknowledgement_notes,
            action_taken: row.action_taken,
            resolved: row.resolved,
            resolved_at: row.resolved_at,
            resolution_notes: row.resolution_notes,
            created_at: row.created_at,
        })
    }
}

fn category_to_string(category: AlertCategory) -> &'static str {
    match category {
        AlertCategory::HighRiskDetected => "high_risk_detected",
        AlertCategory::ComplicationReported => "complication_reported",
    }
}

fn string_to_category(s: &str) -> Result<AlertCategory, DbError> {
    match s {
        "high_risk_detected" => Ok(AlertCategory::HighRiskDetected),
        "complication_reported" => Ok(AlertCategory::ComplicationReported),
        _ => Err(DbError::Constraint(format!("Unknown alert category: {}", s))),
    }
}
