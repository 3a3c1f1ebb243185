//! Observation database operations.

use rusqlite::{params, OptionalExtension};

use super::{
    date_to_sql, opt_date_to_sql, opt_sql_to_date, risk_level_to_string, sql_to_date,
    string_to_risk_level, Database, DbError, DbResult,
};
use crate::models::Observation;

const OBSERVATION_COLUMNS: &str = "id, patient_id, performed_by, check_date, bp_systolic, \
     bp_diastolic, pulse_rate, temperature, respiratory_rate, spo2, hemoglobin, \
     blood_sugar_fasting, blood_sugar_pp, blood_sugar_random, weight_kg, height_cm, \
     fundal_height_cm, fetal_heart_rate, fetal_movement, urine_albumin, urine_sugar, symptoms, \
     swelling_observed, bleeding_reported, headache_reported, blurred_vision_reported, \
     abdominal_pain_reported, risk_score, risk_level, risk_factors, notes, recommendations, \
     next_check_date, created_at, updated_at";

impl Database {
    /// Insert an observation, or overwrite the row with the same id
    /// (the correction path re-persists through here).
    pub fn upsert_observation(&self, obs: &Observation) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO observations (
                id, patient_id, performed_by, check_date, bp_systolic, bp_diastolic,
                pulse_rate, temperature, respiratory_rate, spo2, hemoglobin,
                blood_sugar_fasting, blood_sugar_pp, blood_sugar_random, weight_kg,
                height_cm, fundal_height_cm, fetal_heart_rate, fetal_movement,
                urine_albumin, urine_sugar, symptoms, swelling_observed, bleeding_reported,
                headache_reported, blurred_vision_reported, abdominal_pain_reported,
                risk_score, risk_level, risk_factors, notes, recommendations,
                next_check_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                      ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28,
                      ?29, ?30, ?31, ?32, ?33, ?34, ?35)
            ON CONFLICT(id) DO UPDATE SET
                check_date = excluded.check_date,
                bp_systolic = excluded.bp_systolic,
                bp_diastolic = excluded.bp_diastolic,
                pulse_rate = excluded.pulse_rate,
                temperature = excluded.temperature,
                respiratory_rate = excluded.respiratory_rate,
                spo2 = excluded.spo2,
                hemoglobin = excluded.hemoglobin,
                blood_sugar_fasting = excluded.blood_sugar_fasting,
                blood_sugar_pp = excluded.blood_sugar_pp,
                blood_sugar_random = excluded.blood_sugar_random,
                weight_kg = excluded.weight_kg,
                height_cm = excluded.height_cm,
                fundal_height_cm = excluded.fundal_height_cm,
                fetal_heart_rate = excluded.fetal_heart_rate,
                fetal_movement = excluded.fetal_movement,
                urine_albumin = excluded.urine_albumin,
                urine_sugar = excluded.urine_sugar,
                symptoms = excluded.symptoms,
                swelling_observed = excluded.swelling_observed,
                bleeding_reported = excluded.bleeding_reported,
                headache_reported = excluded.headache_reported,
                blurred_vision_reported = excluded.blurred_vision_reported,
                abdominal_pain_reported = excluded.abdominal_pain_reported,
                risk_score = excluded.risk_score,
                risk_level = excluded.risk_level,
                risk_factors = excluded.risk_factors,
                notes = excluded.notes,
                recommendations = excluded.recommendations,
                next_check_date = excluded.next_check_date,
                updated_at = datetime('now')
            "#,
            params![
                obs.id,
                obs.patient_id,
                obs.performed_by,
                date_to_sql(obs.check_date),
                obs.bp_systolic,
                obs.bp_diastolic,
                obs.pulse_rate,
                obs.temperature,
                obs.respiratory_rate,
                obs.spo2,
                obs.hemoglobin,
                obs.blood_sugar_fasting,
                obs.blood_sugar_pp,
                obs.blood_sugar_random,
                obs.weight_kg,
                obs.height_cm,
                obs.fundal_height_cm,
                obs.fetal_heart_rate,
                obs.fetal_movement,
                obs.urine_albumin,
                obs.urine_sugar,
                obs.symptoms,
                obs.swelling_observed,
                obs.bleeding_reported,
                obs.headache_reported,
                obs.blurred_vision_reported,
                obs.abdominal_pain_reported,
                obs.risk_score,
                risk_level_to_string(obs.risk_level),
                obs.risk_factors,
                obs.notes,
                obs.recommendations,
                opt_date_to_sql(obs.next_check_date),
                obs.created_at,
                obs.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get an observation by ID.
    pub fn get_observation(&self, id: &str) -> DbResult<Option<Observation>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM observations WHERE id = ?", OBSERVATION_COLUMNS),
                [id],
                map_observation_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a patient's observations, newest check first.
    pub fn list_observations_for_patient(&self, patient_id: &str) -> DbResult<Vec<Observation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM observations WHERE patient_id = ? ORDER BY check_date DESC, created_at DESC",
            OBSERVATION_COLUMNS
        ))?;

        let rows = stmt.query_map([patient_id], map_observation_row)?;

        let mut observations = Vec::new();
        for row in rows {
            observations.push(row?.try_into()?);
        }
        Ok(observations)
    }

    /// Most recent observation for a patient, by check date.
    pub fn latest_observation_for_patient(&self, patient_id: &str) -> DbResult<Option<Observation>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM observations WHERE patient_id = ? ORDER BY check_date DESC, created_at DESC LIMIT 1",
                    OBSERVATION_COLUMNS
                ),
                [patient_id],
                map_observation_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }
}

/// Intermediate row struct for database mapping.
struct ObservationRow {
    id: String,
    patient_id: String,
    performed_by: String,
    check_date: String,
    bp_systolic: Option<i32>,
    bp_diastolic: Option<i32>,
    pulse_rate: Option<i32>,
    temperature: Option<f64>,
    respiratory_rate: Option<i32>,
    spo2: Option<i32>,
    hemoglobin: Option<f64>,
    blood_sugar_fasting: Option<f64>,
    blood_sugar_pp: Option<f64>,
    blood_sugar_random: Option<f64>,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    fundal_height_cm: Option<f64>,
    fetal_heart_rate: Option<i32>,
    fetal_movement: Option<bool>,
    urine_albumin: Option<String>,
    urine_sugar: Option<String>,
    symptoms: Option<String>,
    swelling_observed: Option<bool>,
    bleeding_reported: Option<bool>,
    headache_reported: Option<bool>,
    blurred_vision_reported: Option<bool>,
    abdominal_pain_reported: Option<bool>,
    risk_score: u32,
    risk_level: String,
    risk_factors: Option<String>,
    notes: Option<String>,
    recommendations: Option<String>,
    next_check_date: Option<String>,
    created_at: String,
    updated_at: String,
}

fn map_observation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ObservationRow> {
    Ok(ObservationRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        performed_by: row.get(2)?,
        check_date: row.get(3)?,
        bp_systolic: row.get(4)?,
        bp_diastolic: row.get(5)?,
        pulse_rate: row.get(6)?,
        temperature: row.get(7)?,
        respiratory_rate: row.get(8)?,
        spo2: row.get(9)?,
        hemoglobin: row.get(10)?,
        blood_sugar_fasting: row.get(11)?,
        blood_sugar_pp: row.get(12)?,
        blood_sugar_random: row.get(13)?,
        weight_kg: row.get(14)?,
        height_cm: row.get(15)?,
        fundal_height_cm: row.get(16)?,
        fetal_heart_rate: row.get(17)?,
        fetal_movement: row.get(18)?,
        urine_albumin: row.get(19)?,
        urine_sugar: row.get(20)?,
        symptoms: row.get(21)?,
        swelling_observed: row.get(22)?,
        bleeding_reported: row.get(23)?,
        headache_reported: row.get(24)?,
        blurred_vision_reported: row.get(25)?,
        abdominal_pain_reported: row.get(26)?,
        risk_score: row.get(27)?,
        risk_level: row.get(28)?,
        risk_factors: row.get(29)?,
        notes: row.get(30)?,
        recommendations: row.get(31)?,
        next_check_date: row.get(32)?,
        created_at: row.get(33)?,
        updated_at: row.get(34)?,
    })
}

impl TryFrom<ObservationRow> for Observation {
    type Error = DbError;

    fn try_from(row: ObservationRow) -> Result<Self, Self::Error> {
        Ok(Observation {
            id: row.id,
            patient_id: row.patient_id,
            performed_by: row.performed_by,
            check_date: sql_to_date(&row.check_date)?,
            bp_systolic: row.bp_systolic,
            bp_diastolic: row.bp_diastolic,
            pulse_rate: row.pulse_rate,
            temperature: row.temperature,
            respiratory_rate: row.respiratory_rate,
            spo2: row.spo2,
            hemoglobin: row.hemoglobin,
            blood_sugar_fasting: row.blood_sugar_fasting,
            blood_sugar_pp: row.blood_sugar_pp,
            blood_sugar_random: row.blood_sugar_random,
            weight_kg: row.weight_kg,
            height_cm: row.height_cm,
            fundal_height_cm: row.fundal_height_cm,
            fetal_heart_rate: row.fetal_heart_rate,
            fetal_movement: row.fetal_movement,
            urine_albumin: row.urine_albumin,
            urine_sugar: row.urine_sugar,
            symptoms: row.symptoms,
            swelling_observed: row.swelling_observed,
            bleeding_reported: row.bleeding_reported,
            headache_reported: row.headache_reported,
            blurred_vision_reported: row.blurred_vision_reported,
            abdominal_pain_reported: row.abdominal_pain_reported,
            risk_score: row.risk_score,
            risk_level: string_to_risk_level(&row.risk_level)?,
            risk_factors: row.risk_factors,
            notes: row.notes,
            recommendations: row.recommendations,
            next_check_date: opt_sql_to_date(row.next_check_date)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
