//! Follow-up task database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{date_to_sql, opt_date_to_sql, opt_sql_to_date, sql_to_date, Database, DbError, DbResult};
use crate::models::{FollowUp, FollowUpStatus};

const FOLLOW_UP_COLUMNS: &str = "id, patient_id, assigned_to, scheduled_date, status, \
     call_attempted_at, call_completed_at, call_duration_seconds, attempt_count, \
     patient_condition, symptoms_reported, medication_compliance, concerns_raised, \
     advice_given, requires_doctor_consultation, requires_immediate_attention, notes, \
     photo_url, next_follow_up_date, triggered_by_observation, triggered_by_consultation, \
     created_at, updated_at";

impl Database {
    /// Insert a new follow-up task.
    pub fn insert_follow_up(&self, task: &FollowUp) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO follow_ups (
                id, patient_id, assigned_to, scheduled_date, status, call_attempted_at,
                call_completed_at, call_duration_seconds, attempt_count, patient_condition,
                symptoms_reported, medication_compliance, concerns_raised, advice_given,
                requires_doctor_consultation, requires_immediate_attention, notes, photo_url,
                next_follow_up_date, triggered_by_observation, triggered_by_consultation,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                      ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)
            "#,
            params![
                task.id,
                task.patient_id,
                task.assigned_to,
                date_to_sql(task.scheduled_date),
                status_to_string(task.status),
                task.call_attempted_at,
                task.call_completed_at,
                task.call_duration_seconds,
                task.attempt_count,
                task.patient_condition,
                task.symptoms_reported,
                task.medication_compliance,
                task.concerns_raised,
                task.advice_given,
                task.requires_doctor_consultation,
                task.requires_immediate_attention,
                task.notes,
                task.photo_url,
                opt_date_to_sql(task.next_follow_up_date),
                task.triggered_by_observation,
                task.triggered_by_consultation,
                task.created_at,
                task.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Persist the mutable fields of an existing follow-up.
    pub fn update_follow_up(&self, task: &FollowUp) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE follow_ups SET
                assigned_to = ?2,
                scheduled_date = ?3,
                status = ?4,
                call_attempted_at = ?5,
                call_completed_at = ?6,
                call_duration_seconds = ?7,
                attempt_count = ?8,
                patient_condition = ?9,
                symptoms_reported = ?10,
                medication_compliance = ?11,
                concerns_raised = ?12,
                advice_given = ?13,
                requires_doctor_consultation = ?14,
                requires_immediate_attention = ?15,
                notes = ?16,
                photo_url = ?17,
                next_follow_up_date = ?18,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                task.id,
                task.assigned_to,
                date_to_sql(task.scheduled_date),
                status_to_string(task.status),
                task.call_attempted_at,
                task.call_completed_at,
                task.call_duration_seconds,
                task.attempt_count,
                task.patient_condition,
                task.symptoms_reported,
                task.medication_compliance,
                task.concerns_raised,
                task.advice_given,
                task.requires_doctor_consultation,
                task.requires_immediate_attention,
                task.notes,
                task.photo_url,
                opt_date_to_sql(task.next_follow_up_date),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a follow-up by ID.
    pub fn get_follow_up(&self, id: &str) -> DbResult<Option<FollowUp>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM follow_ups WHERE id = ?", FOLLOW_UP_COLUMNS),
                [id],
                map_follow_up_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a patient's follow-ups, soonest scheduled first.
    pub fn list_follow_ups_for_patient(&self, patient_id: &str) -> DbResult<Vec<FollowUp>> {
        self.query_follow_ups(
            &format!(
                "SELECT {} FROM follow_ups WHERE patient_id = ? ORDER BY scheduled_date",
                FOLLOW_UP_COLUMNS
            ),
            [patient_id],
        )
    }

    /// List an assignee's follow-ups, soonest scheduled first.
    pub fn list_follow_ups_for_assignee(&self, user_id: &str) -> DbResult<Vec<FollowUp>> {
        self.query_follow_ups(
            &format!(
                "SELECT {} FROM follow_ups WHERE assigned_to = ? ORDER BY scheduled_date",
                FOLLOW_UP_COLUMNS
            ),
            [user_id],
        )
    }

    /// List actionable follow-ups due on a date.
    pub fn list_follow_ups_due_on(&self, date: NaiveDate) -> DbResult<Vec<FollowUp>> {
        self.query_follow_ups(
            &format!(
                "SELECT {} FROM follow_ups
                 WHERE scheduled_date = ? AND status IN ('pending', 'rescheduled')
                 ORDER BY created_at",
                FOLLOW_UP_COLUMNS
            ),
            [date_to_sql(date)],
        )
    }

    /// List actionable follow-ups scheduled before a date (overdue).
    pub fn list_overdue_follow_ups(&self, as_of: NaiveDate) -> DbResult<Vec<FollowUp>> {
        self.query_follow_ups(
            &format!(
                "SELECT {} FROM follow_ups
                 WHERE scheduled_date < ? AND status IN ('pending', 'rescheduled')
                 ORDER BY scheduled_date",
                FOLLOW_UP_COLUMNS
            ),
            [date_to_sql(as_of)],
        )
    }

    fn query_follow_ups<P: rusqlite::Params>(&self, sql: &str, params: P) -> DbResult<Vec<FollowUp>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map_follow_up_row)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?.try_into()?);
        }
        Ok(tasks)
    }
}

/// Intermediate row struct for database mapping.
struct FollowUpRow {
    id: String,
    patient_id: String,
    assigned_to: String,
    scheduled_date: String,
    status: String,
    call_attempted_at: Option<String>,
    call_completed_at: Option<String>,
    call_duration_seconds: Option<i32>,
    attempt_count: u32,
    patient_condition: Option<String>,
    symptoms_reported: Option<String>,
    medication_compliance: Option<bool>,
    concerns_raised: Option<String>,
    advice_given: Option<String>,
    requires_doctor_consultation: bool,
    requires_immediate_attention: bool,
    notes: Option<String>,
    photo_url: Option<String>,
    next_follow_up_date: Option<String>,
    triggered_by_observation: Option<String>,
    triggered_by_consultation: Option<String>,
    created_at: String,
    updated_at: String,
}

fn map_follow_up_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FollowUpRow> {
    Ok(FollowUpRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        assigned_to: row.get(2)?,
        scheduled_date: row.get(3)?,
        status: row.get(4)?,
        call_attempted_at: row.get(5)?,
        call_completed_at: row.get(6)?,
        call_duration_seconds: row.get(7)?,
        attempt_count: row.get(8)?,
        patient_condition: row.get(9)?,
        symptoms_reported: row.get(10)?,
        medication_compliance: row.get(11)?,
        concerns_raised: row.get(12)?,
        advice_given: row.get(13)?,
        requires_doctor_consultation: row.get(14)?,
        requires_immediate_attention: row.get(15)?,
        notes: row.get(16)?,
        photo_url: row.get(17)?,
        next_follow_up_date: row.get(18)?,
        triggered_by_observation: row.get(19)?,
        triggered_by_consultation: row.get(20)?,
        created_at: row.get(21)?,
        updated_at: row.get(22)?,
    })
}

impl TryFrom<FollowUpRow> for FollowUp {
    type Error = DbError;

    fn try_from(row: FollowUpRow) -> Result<Self, Self::Error> {
        Ok(FollowUp {
            id: row.id,
            patient_id: row.patient_id,
            assigned_to: row.assigned_to,
            scheduled_date: sql_to_date(&row.scheduled_date)?,
            status: string_to_status(&row.status)?,
            call_attempted_at: row.call_attempted_at,
            call_completed_at: row.call_completed_at,
            call_duration_seconds: row.call_duration_seconds,
            attempt_count: row.attempt_count,
            patient_condition: row.patient_condition,
            symptoms_reported: row.symptoms_reported,
            medication_compliance: row.medication_compliance,
            concerns_raised: row.concerns_raised,
            advice_given: row.advice_given,
            requires_doctor_consultation: row.requires_doctor_consultation,
            requires_immediate_attention: row.requires_immediate_attention,
            notes: row.notes,
            photo_url: row.photo_url,
            next_follow_up_date: opt_sql_to_date(row.next_follow_up_date)?,
            triggered_by_observation: row.triggered_by_observation,
            triggered_by_consultation: row.triggered_by_consultation,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn status_to_string(status: FollowUpStatus) -> &'static str {
    match status {
        FollowUpStatus::Pending => "pending",
        FollowUpStatus::Completed => "completed",
        FollowUpStatus::NoAnswer => "no_answer",
        FollowUpStatus::Rescheduled => "rescheduled",
        FollowUpStatus::Cancelled => "cancelled",
    }
}

fn string_to_status(s: &str) -> Result<FollowUpStatus, DbError> {
    match s {
        "pending" => Ok(FollowUpStatus::Pending),
        "completed" => Ok(FollowUpStatus::Completed),
        "no_answer" => Ok(FollowUpStatus::NoAnswer),
        "rescheduled" => Ok(FollowUpStatus::Rescheduled),
        "cancelled" => Ok(FollowUpStatus::Cancelled),
        _ => Err(DbError::Constraint(format!("Unknown follow-up status: {}", s))),
    }
}
