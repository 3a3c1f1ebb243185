//! Patient database operations.

use rusqlite::{params, OptionalExtension};

use super::{
    opt_date_to_sql, opt_sql_to_date, risk_level_to_string, string_to_risk_level, Database,
    DbError, DbResult,
};
use crate::models::{Patient, RiskLevel};

const PATIENT_COLUMNS: &str = "id, mother_id, name, age, mobile_number, village, district, \
     lmp_date, edd_date, gravida, para, blood_group, has_previous_complications, \
     previous_complications_details, medical_history, current_risk_score, current_risk_level, \
     created_at, updated_at";

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, mother_id, name, age, mobile_number, village, district,
                lmp_date, edd_date, gravida, para, blood_group,
                has_previous_complications, previous_complications_details,
                medical_history, current_risk_score, current_risk_level,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
            "#,
            params![
                patient.id,
                patient.mother_id,
                patient.name,
                patient.age,
                patient.mobile_number,
                patient.village,
                patient.district,
                opt_date_to_sql(patient.lmp_date),
                opt_date_to_sql(patient.edd_date),
                patient.gravida,
                patient.para,
                patient.blood_group,
                patient.has_previous_complications,
                patient.previous_complications_details,
                patient.medical_history,
                patient.current_risk_score,
                risk_level_to_string(patient.current_risk_level),
                patient.created_at,
                patient.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM patients WHERE id = ?", PATIENT_COLUMNS),
                [id],
                map_patient_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get a patient by registry number.
    pub fn get_patient_by_mother_id(&self, mother_id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM patients WHERE mother_id = ?", PATIENT_COLUMNS),
                [mother_id],
                map_patient_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Overwrite a patient's risk snapshot with the latest scored result.
    pub fn update_patient_risk(
        &self,
        patient_id: &str,
        score: u32,
        level: RiskLevel,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                current_risk_score = ?2,
                current_risk_level = ?3,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![patient_id, score, risk_level_to_string(level)],
        )?;
        Ok(rows_affected > 0)
    }

    /// List patients currently at or above a risk level, highest score first.
    pub fn list_patients_at_risk(&self, min_level: RiskLevel) -> DbResult<Vec<Patient>> {
        let levels: &[&str] = match min_level {
            RiskLevel::Stable => &["stable", "moderate", "severe"],
            RiskLevel::Moderate => &["moderate", "severe"],
            RiskLevel::Severe => &["severe"],
        };
        let placeholders = vec!["?"; levels.len()].join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM patients WHERE current_risk_level IN ({}) ORDER BY current_risk_score DESC",
            PATIENT_COLUMNS, placeholders
        ))?;

        let rows = stmt.query_map(rusqlite::params_from_iter(levels.iter()), map_patient_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }
}

/// Intermediate row struct for database mapping.
struct PatientRow {
    id: String,
    mother_id: String,
    name: String,
    age: u32,
    mobile_number: Option<String>,
    village: Option<String>,
    district: Option<String>,
    lmp_date: Option<String>,
    edd_date: Option<String>,
    gravida: Option<u32>,
    para: Option<u32>,
    blood_group: Option<String>,
    has_previous_complications: bool,
    previous_complications_details: Option<String>,
    medical_history: Option<String>,
    current_risk_score: u32,
    current_risk_level: String,
    created_at: String,
    updated_at: String,
}

fn map_patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        mother_id: row.get(1)?,
        name: row.get(2)?,
        age: row.get(3)?,
        mobile_number: row.get(4)?,
        village: row.get(5)?,
        district: row.get(6)?,
        lmp_date: row.get(7)?,
        edd_date: row.get(8)?,
        gravida: row.get(9)?,
        para: row.get(10)?,
        blood_group: row.get(11)?,
        has_previous_complications: row.get(12)?,
        previous_complications_details: row.get(13)?,
        medical_history: row.get(14)?,
        current_risk_score: row.get(15)?,
        current_risk_level: row.get(16)?,
        created_at: row.get(17)?,
        updated_at: row.get(18)?,
    })
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        Ok(Patient {
            id: row.id,
            mother_id: row.mother_id,
            name: row.name,
            age: row.age,
            mobile_number: row.mobile_number,
            village: row.village,
            district: row.district,
            lmp_date: opt_sql_to_date(row.lmp_date)?,
            edd_date: opt_sql_to_date(row.edd_date)?,
            gravida: row.gravida,
            para: row.para,
            blood_group: row.blood_group,
            has_previous_complications: row.has_previous_complications,
            previous_complications_details: row.previous_complications_details,
            medical_history: row.medical_history,
            current_risk_score: row.current_risk_score,
            current_risk_level: string_to_risk_level(&row.current_risk_level)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let mut patient = Patient::new("MR-2025-014".into(), "Anita".into(), 26);
        patient.village = Some("Kadapa".into());
        patient.lmp_date = NaiveDate::from_ymd_opt(2025, 1, 4);
        patient.has_previous_complications = true;

        db.insert_patient(&patient).unwrap();

        let retrieved = db.get_patient(&patient.id).unwrap().unwrap();
        assert_eq!(retrieved.mother_id, "MR-2025-014");
        assert_eq!(retrieved.age, 26);
        assert_eq!(retrieved.village, Some("Kadapa".into()));
        assert_eq!(retrieved.lmp_date, NaiveDate::from_ymd_opt(2025, 1, 4));
        assert!(retrieved.has_previous_complications);
        assert_eq!(retrieved.current_risk_level, RiskLevel::Stable);
    }

    #[test]
    fn test_get_by_mother_id() {
        let db = setup_db();

        let patient = Patient::new("MR-2025-014".into(), "Anita".into(), 26);
        db.insert_patient(&patient).unwrap();

        let retrieved = db.get_patient_by_mother_id("MR-2025-014").unwrap().unwrap();
        assert_eq!(retrieved.id, patient.id);

        assert!(db.get_patient_by_mother_id("MR-0000").unwrap().is_none());
    }

    #[test]
    fn test_update_risk_snapshot() {
        let db = setup_db();

        let patient = Patient::new("MR-2025-014".into(), "Anita".into(), 26);
        db.insert_patient(&patient).unwrap();

        let updated = db
            .update_patient_risk(&patient.id, 9, RiskLevel::Severe)
            .unwrap();
        assert!(updated);

        let retrieved = db.get_patient(&patient.id).unwrap().unwrap();
        assert_eq!(retrieved.current_risk_score, 9);
        assert_eq!(retrieved.current_risk_level, RiskLevel::Severe);

        // Snapshot is overwritten, not accumulated
        db.update_patient_risk(&patient.id, 2, RiskLevel::Stable)
            .unwrap();
        let retrieved = db.get_patient(&patient.id).unwrap().unwrap();
        assert_eq!(retrieved.current_risk_score, 2);
        assert_eq!(retrieved.current_risk_level, RiskLevel::Stable);
    }

    #[test]
    fn test_list_patients_at_risk() {
        let db = setup_db();

        let stable = Patient::new("MR-1".into(), "Anita".into(), 26);
        let moderate = Patient::new("MR-2".into(), "Bina".into(), 30);
        let severe = Patient::new("MR-3".into(), "Chitra".into(), 41);
        db.insert_patient(&stable).unwrap();
        db.insert_patient(&moderate).unwrap();
        db.insert_patient(&severe).unwrap();
        db.update_patient_risk(&moderate.id, 5, RiskLevel::Moderate)
            .unwrap();
        db.update_patient_risk(&severe.id, 11, RiskLevel::Severe)
            .unwrap();

        let at_risk = db.list_patients_at_risk(RiskLevel::Moderate).unwrap();
        assert_eq!(at_risk.len(), 2);
        assert_eq!(at_risk[0].id, severe.id); // highest score first
        assert_eq!(at_risk[1].id, moderate.id);
    }
}
