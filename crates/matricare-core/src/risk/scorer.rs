//! Pure risk scoring over one clinical observation.
//!
//! Point rules, applied additively in a fixed order (absent fields
//! contribute nothing):
//! - Blood pressure, highest matching tier only: severe hypertension 4,
//!   high 3, elevated 1, hypotension 2
//! - Hemoglobin: severe anemia 4, moderate 2, mild 1
//! - Blood sugar: maximum over fasting/random/post-prandial readings, 3 or 1
//! - Age: under 18 → 2, over 40 → 3, over 35 → 2
//! - Prior pregnancy complications: 3
//! - Danger signs, each on its own: bleeding 4, swelling 2, headache 2,
//!   blurred vision 3, abdominal pain 3, albuminuria "++"/"+++" 3
//! - Oxygen saturation below 95: 2
//! - Fetal heart rate outside 110-160: 3
//! - Fetal movement reported absent: 3

use crate::models::{Observation, Patient};

/// Score an observation against its patient's context.
///
/// Returns the total score and the triggered risk factors in rule
/// order. Deterministic and side-effect free; every factor string
/// corresponds to a nonzero contribution.
pub fn score(observation: &Observation, patient: &Patient) -> (u32, Vec<String>) {
    let mut contributions: Vec<(u32, String)> = Vec::new();

    if let Some(c) = score_blood_pressure(observation) {
        contributions.push(c);
    }
    if let Some(c) = score_hemoglobin(observation) {
        contributions.push(c);
    }
    if let Some(c) = score_blood_sugar(observation) {
        contributions.push(c);
    }
    if let Some(c) = score_age(patient) {
        contributions.push(c);
    }
    if patient.has_previous_complications {
        contributions.push((3, "History of Previous Complications".to_string()));
    }
    contributions.extend(score_danger_signs(observation));
    if let Some(c) = score_oxygen_saturation(observation) {
        contributions.push(c);
    }
    if let Some(c) = score_fetal_heart_rate(observation) {
        contributions.push(c);
    }
    if let Some(c) = score_fetal_movement(observation) {
        contributions.push(c);
    }

    let total = contributions.iter().map(|(points, _)| points).sum();
    let factors = contributions.into_iter().map(|(_, factor)| factor).collect();
    (total, factors)
}

/// Blood pressure tiers are mutually exclusive; the guard order is
/// semantic because the ranges overlap.
fn score_blood_pressure(obs: &Observation) -> Option<(u32, String)> {
    let (systolic, diastolic) = match (obs.bp_systolic, obs.bp_diastolic) {
        (Some(s), Some(d)) => (s, d),
        _ => return None,
    };

    if systolic >= 160 || diastolic >= 110 {
        Some((4, format!("Severe Hypertension (BP: {}/{})", systolic, diastolic)))
    } else if systolic >= 140 || diastolic >= 90 {
        Some((3, format!("High Blood Pressure (BP: {}/{})", systolic, diastolic)))
    } else if systolic >= 130 || diastolic >= 85 {
        Some((1, "Elevated Blood Pressure".to_string()))
    } else if systolic < 90 || diastolic < 60 {
        Some((2, format!("Hypotension (BP: {}/{})", systolic, diastolic)))
    } else {
        None
    }
}

fn score_hemoglobin(obs: &Observation) -> Option<(u32, String)> {
    let hb = obs.hemoglobin?;

    if hb < 7.0 {
        Some((4, format!("Severe Anemia (Hb: {} g/dL)", hb)))
    } else if hb < 9.0 {
        Some((2, format!("Moderate Anemia (Hb: {} g/dL)", hb)))
    } else if hb < 11.0 {
        Some((1, "Mild Anemia".to_string()))
    } else {
        None
    }
}

/// The three sugar readings do not stack; the worst one counts.
fn score_blood_sugar(obs: &Observation) -> Option<(u32, String)> {
    let mut points = 0u32;

    if let Some(fasting) = obs.blood_sugar_fasting {
        if fasting >= 126.0 {
            points = points.max(3);
        } else if fasting >= 100.0 {
            points = points.max(1);
        }
    }
    if let Some(random) = obs.blood_sugar_random {
        if random >= 200.0 {
            points = points.max(3);
        } else if random >= 140.0 {
            points = points.max(1);
        }
    }
    if let Some(pp) = obs.blood_sugar_pp {
        if pp >= 180.0 {
            points = points.max(3);
        } else if pp >= 140.0 {
            points = points.max(1);
        }
    }

    match points {
        0 => None,
        p if p >= 3 => Some((p, "High Blood Sugar - Possible Gestational Diabetes".to_string())),
        p => Some((p, "Elevated Blood Sugar".to_string())),
    }
}

/// The over-40 bracket outranks over-35; the guard order is semantic.
fn score_age(patient: &Patient) -> Option<(u32, String)> {
    let age = patient.age;

    let points = if age < 18 {
        2
    } else if age > 40 {
        3
    } else if age > 35 {
        2
    } else {
        return None;
    };

    Some((points, format!("High Risk Age Group ({} years)", age)))
}

fn score_danger_signs(obs: &Observation) -> Vec<(u32, String)> {
    let mut signs = Vec::new();

    if obs.bleeding_reported == Some(true) {
        signs.push((4, "Vaginal Bleeding Reported".to_string()));
    }
    if obs.swelling_observed == Some(true) {
        signs.push((2, "Swelling/Edema Observed".to_string()));
    }
    if obs.headache_reported == Some(true) {
        signs.push((2, "Severe Headache Reported".to_string()));
    }
    if obs.blurred_vision_reported == Some(true) {
        signs.push((3, "Blurred Vision Reported".to_string()));
    }
    if obs.abdominal_pain_reported == Some(true) {
        signs.push((3, "Abdominal Pain Reported".to_string()));
    }
    if let Some(grade) = obs.urine_albumin.as_deref() {
        if grade == "++" || grade == "+++" {
            signs.push((3, format!("Protein in Urine (Albuminuria: {})", grade)));
        }
    }

    signs
}

fn score_oxygen_saturation(obs: &Observation) -> Option<(u32, String)> {
    let spo2 = obs.spo2?;
    if spo2 < 95 {
        Some((2, format!("Low Oxygen Saturation (SpO2: {}%)", spo2)))
    } else {
        None
    }
}

fn score_fetal_heart_rate(obs: &Observation) -> Option<(u32, String)> {
    let fhr = obs.fetal_heart_rate?;
    if !(110..=160).contains(&fhr) {
        Some((3, format!("Abnormal Fetal Heart Rate ({} bpm)", fhr)))
    } else {
        None
    }
}

/// Only an explicit "no movement felt" report scores.
fn score_fetal_movement(obs: &Observation) -> Option<(u32, String)> {
    if obs.fetal_movement == Some(false) {
        Some((3, "Reduced Fetal Movement Reported".to_string()))
    } else {
        None
    }
}
