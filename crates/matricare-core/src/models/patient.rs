//! Patient models.

use serde::{Deserialize, Serialize};

use super::RiskLevel;

/// A registered antenatal patient with her current risk snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Local UUID
    pub id: String,
    /// Registry number assigned at enrollment (unique)
    pub mother_id: String,
    /// Patient name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Contact number
    pub mobile_number: Option<String>,
    /// Village
    pub village: Option<String>,
    /// District
    pub district: Option<String>,
    /// Last menstrual period (pregnancy dating)
    pub lmp_date: Option<chrono::NaiveDate>,
    /// Expected delivery date
    pub edd_date: Option<chrono::NaiveDate>,
    /// Number of pregnancies including this one
    pub gravida: Option<u32>,
    /// Number of prior births
    pub para: Option<u32>,
    /// Blood group
    pub blood_group: Option<String>,
    /// Prior pregnancy complications flag (contributes to scoring)
    pub has_previous_complications: bool,
    /// Details of prior complications
    pub previous_complications_details: Option<String>,
    /// General medical history
    pub medical_history: Option<String>,
    /// Risk snapshot: score from the most recently scored observation
    pub current_risk_score: u32,
    /// Risk snapshot: level from the most recently scored observation
    pub current_risk_level: RiskLevel,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Patient {
    /// Create a new patient with required fields. Starts with an empty
    /// (stable, zero) risk snapshot.
    pub fn new(mother_id: String, name: String, age: u32) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            mother_id,
            name,
            age,
            mobile_number: None,
            village: None,
            district: None,
            lmp_date: None,
            edd_date: None,
            gravida: None,
            para: None,
            blood_group: None,
            has_previous_complications: false,
            previous_complications_details: None,
            medical_history: None,
            current_risk_score: 0,
            current_risk_level: RiskLevel::Stable,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Check whether the current snapshot marks this patient as needing
    /// escalated attention.
    pub fn is_high_risk(&self) -> bool {
        self.current_risk_level >= RiskLevel::Moderate
    }
}
