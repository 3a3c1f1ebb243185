//! Clinical observation models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::RiskLevel;

/// One clinical check for a patient.
///
/// Every measurement is optional; absent fields simply contribute
/// nothing to the risk score. After scoring, `risk_score`, `risk_level`
/// and `risk_factors` carry the derived result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    /// Local UUID
    pub id: String,
    /// Patient this check belongs to
    pub patient_id: String,
    /// Staff member who performed the check
    pub performed_by: String,
    /// Date of the check
    pub check_date: NaiveDate,

    // Vital signs
    /// Systolic blood pressure (mmHg)
    pub bp_systolic: Option<i32>,
    /// Diastolic blood pressure (mmHg)
    pub bp_diastolic: Option<i32>,
    /// Pulse rate (bpm)
    pub pulse_rate: Option<i32>,
    /// Body temperature (degrees F)
    pub temperature: Option<f64>,
    /// Respiratory rate (breaths/min)
    pub respiratory_rate: Option<i32>,
    /// Oxygen saturation (%)
    pub spo2: Option<i32>,

    // Blood tests
    /// Hemoglobin (g/dL)
    pub hemoglobin: Option<f64>,
    /// Fasting blood sugar (mg/dL)
    pub blood_sugar_fasting: Option<f64>,
    /// Post-prandial blood sugar (mg/dL)
    pub blood_sugar_pp: Option<f64>,
    /// Random blood sugar (mg/dL)
    pub blood_sugar_random: Option<f64>,

    // Physical measurements
    /// Weight (kg)
    pub weight_kg: Option<f64>,
    /// Height (cm)
    pub height_cm: Option<f64>,
    /// Fundal height (cm)
    pub fundal_height_cm: Option<f64>,

    // Pregnancy specific
    /// Fetal heart rate (bpm)
    pub fetal_heart_rate: Option<i32>,
    /// Whether fetal movement was felt (false scores as reduced movement)
    pub fetal_movement: Option<bool>,
    /// Urine albumin grade ("nil", "trace", "+", "++", "+++")
    pub urine_albumin: Option<String>,
    /// Urine sugar grade
    pub urine_sugar: Option<String>,

    // Reported danger signs
    /// Free-text symptoms
    pub symptoms: Option<String>,
    /// Swelling/edema observed
    pub swelling_observed: Option<bool>,
    /// Vaginal bleeding reported
    pub bleeding_reported: Option<bool>,
    /// Severe headache reported
    pub headache_reported: Option<bool>,
    /// Blurred vision reported
    pub blurred_vision_reported: Option<bool>,
    /// Abdominal pain reported
    pub abdominal_pain_reported: Option<bool>,

    // Derived risk result
    /// Total risk score (sum of rule contributions)
    pub risk_score: u32,
    /// Severity classification for the score
    pub risk_level: RiskLevel,
    /// Triggered risk factors, semicolon-joined in evaluation order
    pub risk_factors: Option<String>,

    // Staff notes
    /// Free-text notes
    pub notes: Option<String>,
    /// Recommendations given to the patient
    pub recommendations: Option<String>,
    /// Suggested date for the next routine check
    pub next_check_date: Option<NaiveDate>,

    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Observation {
    /// Create an empty observation for a patient, dated today.
    pub fn new(patient_id: String, performed_by: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            performed_by,
            check_date: now.date_naive(),
            bp_systolic: None,
            bp_diastolic: None,
            pulse_rate: None,
            temperature: None,
            respiratory_rate: None,
            spo2: None,
            hemoglobin: None,
            blood_sugar_fasting: None,
            blood_sugar_pp: None,
            blood_sugar_random: None,
            weight_kg: None,
            height_cm: None,
            fundal_height_cm: None,
            fetal_heart_rate: None,
            fetal_movement: None,
            urine_albumin: None,
            urine_sugar: None,
            symptoms: None,
            swelling_observed: None,
            bleeding_reported: None,
            headache_reported: None,
            blurred_vision_reported: None,
            abdominal_pain_reported: None,
            risk_score: 0,
            risk_level: RiskLevel::Stable,
            risk_factors: None,
            notes: None,
            recommendations: None,
            next_check_date: None,
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        }
    }
}

/// Manual follow-up request attached to an observation input.
///
/// Its presence suppresses any automatic follow-up the escalation
/// policy would otherwise schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManualFollowUp {
    /// Requested call date
    pub scheduled_date: NaiveDate,
    /// Requested assignee; falls back to the performing user when absent
    /// or unresolvable
    pub assignee_id: Option<String>,
    /// Notes for the caller
    pub notes: Option<String>,
}

/// Input for recording (or correcting) a clinical check.
///
/// Clinical fields mirror [`Observation`]. An `id` referring to an
/// existing observation of the same patient turns the call into a
/// correction of that record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservationInput {
    /// Existing observation id for corrections; `None` inserts fresh
    pub id: Option<String>,
    /// Patient the check belongs to
    pub patient_id: String,
    /// Date of the check; defaults to today when absent
    pub check_date: Option<NaiveDate>,

    pub bp_systolic: Option<i32>,
    pub bp_diastolic: Option<i32>,
    pub pulse_rate: Option<i32>,
    pub temperature: Option<f64>,
    pub respiratory_rate: Option<i32>,
    pub spo2: Option<i32>,
    pub hemoglobin: Option<f64>,
    pub blood_sugar_fasting: Option<f64>,
    pub blood_sugar_pp: Option<f64>,
    pub blood_sugar_random: Option<f64>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub fundal_height_cm: Option<f64>,
    pub fetal_heart_rate: Option<i32>,
    pub fetal_movement: Option<bool>,
    pub urine_albumin: Option<String>,
    pub urine_sugar: Option<String>,
    pub symptoms: Option<String>,
    pub swelling_observed: Option<bool>,
    pub bleeding_reported: Option<bool>,
    pub headache_reported: Option<bool>,
    pub blurred_vision_reported: Option<bool>,
    pub abdominal_pain_reported: Option<bool>,
    pub notes: Option<String>,
    pub recommendations: Option<String>,
    pub next_check_date: Option<NaiveDate>,

    /// Explicit follow-up request; suppresses auto-scheduling
    pub manual_follow_up: Option<ManualFollowUp>,
    /// When false, no follow-up is auto-scheduled even for severe risk
    pub auto_follow_up: bool,
}

impl ObservationInput {
    /// Create an empty input for a patient with auto follow-up enabled.
    pub fn new(patient_id: String) -> Self {
        Self {
            id: None,
            patient_id,
            check_date: None,
            bp_systolic: None,
            bp_diastolic: None,
            pulse_rate: None,
            temperature: None,
            respiratory_rate: None,
            spo2: None,
            hemoglobin: None,
            blood_sugar_fasting: None,
            blood_sugar_pp: None,
            blood_sugar_random: None,
            weight_kg: None,
            height_cm: None,
            fundal_height_cm: None,
            fetal_heart_rate: None,
            fetal_movement: None,
            urine_albumin: None,
            urine_sugar: None,
            symptoms: None,
            swelling_observed: None,
            bleeding_reported: None,
            headache_reported: None,
            blurred_vision_reported: None,
            abdominal_pain_reported: None,
            notes: None,
            recommendations: None,
            next_check_date: None,
            manual_follow_up: None,
            auto_follow_up: true,
        }
    }

    /// Sanity-check numeric fields against plausible physiological
    /// ranges. Runs before any scoring or persistence.
    pub fn validate(&self) -> Result<(), String> {
        check_int("bp_systolic", self.bp_systolic, 60, 250)?;
        check_int("bp_diastolic", self.bp_diastolic, 40, 150)?;
        check_int("pulse_rate", self.pulse_rate, 40, 200)?;
        check_int("spo2", self.spo2, 70, 100)?;
        check_int("fetal_heart_rate", self.fetal_heart_rate, 40, 250)?;
        check_float("hemoglobin", self.hemoglobin, 1.0, 25.0)?;
        Ok(())
    }

    /// Copy every clinical and note field onto an observation. Used for
    /// fresh inserts and for in-place corrections alike.
    pub fn apply_to(&self, obs: &mut Observation) {
        if let Some(date) = self.check_date {
            obs.check_date = date;
        }
        obs.bp_systolic = self.bp_systolic;
        obs.bp_diastolic = self.bp_diastolic;
        obs.pulse_rate = self.pulse_rate;
        obs.temperature = self.temperature;
        obs.respiratory_rate = self.respiratory_rate;
        obs.spo2 = self.spo2;
        obs.hemoglobin = self.hemoglobin;
        obs.blood_sugar_fasting = self.blood_sugar_fasting;
        obs.blood_sugar_pp = self.blood_sugar_pp;
        obs.blood_sugar_random = self.blood_sugar_random;
        obs.weight_kg = self.weight_kg;
        obs.height_cm = self.height_cm;
        obs.fundal_height_cm = self.fundal_height_cm;
        obs.fetal_heart_rate = self.fetal_heart_rate;
        obs.fetal_movement = self.fetal_movement;
        obs.urine_albumin = self.urine_albumin.clone();
        obs.urine_sugar = self.urine_sugar.clone();
        obs.symptoms = self.symptoms.clone();
        obs.swelling_observed = self.swelling_observed;
        obs.bleeding_reported = self.bleeding_reported;
        obs.headache_reported = self.headache_reported;
        obs.blurred_vision_reported = self.blurred_vision_reported;
        obs.abdominal_pain_reported = self.abdominal_pain_reported;
        obs.notes = self.notes.clone();
        obs.recommendations = self.recommendations.clone();
        obs.next_check_date = self.next_check_date;
    }
}

fn check_int(name: &str, value: Option<i32>, min: i32, max: i32) -> Result<(), String> {
    match value {
        Some(v) if v < min || v > max => Err(format!(
            "{} out of range: {} (expected {}..={})",
            name, v, min, max
        )),
        _ => Ok(()),
    }
}

fn check_float(name: &str, value: Option<f64>, min: f64, max: f64) -> Result<(), String> {
    match value {
        Some(v) if v < min || v > max => Err(format!(
            "{} out of range: {} (expected {}..={})",
            name, v, min, max
        )),
        _ => Ok(()),
    }
}
