//! Golden tests for the risk scorer.
//!
//! These tests pin the point rules and threshold classification against
//! known clinical scenarios.

use matricare_core::models::{Observation, Patient, RiskLevel};
use matricare_core::risk::{score, EscalationPolicy};

struct GoldenCase {
    id: &'static str,
    age: u32,
    previous_complications: bool,
    bp: Option<(i32, i32)>,
    hemoglobin: Option<f64>,
    blood_sugar_fasting: Option<f64>,
    blood_sugar_random: Option<f64>,
    spo2: Option<i32>,
    fetal_heart_rate: Option<i32>,
    fetal_movement: Option<bool>,
    urine_albumin: Option<&'static str>,
    bleeding: bool,
    swelling: bool,
    headache: bool,
    blurred_vision: bool,
    abdominal_pain: bool,
    expected_score: u32,
    expected_level: RiskLevel,
}

impl Default for GoldenCase {
    fn default() -> Self {
        GoldenCase {
            id: "",
            age: 25,
            previous_complications: false,
            bp: None,
            hemoglobin: None,
            blood_sugar_fasting: None,
            blood_sugar_random: None,
            spo2: None,
            fetal_heart_rate: None,
            fetal_movement: None,
            urine_albumin: None,
            bleeding: false,
            swelling: false,
            headache: false,
            blurred_vision: false,
            abdominal_pain: false,
            expected_score: 0,
            expected_level: RiskLevel::Stable,
        }
    }
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "normal-vitals",
            bp: Some((118, 76)),
            hemoglobin: Some(12.5),
            spo2: Some(98),
            fetal_heart_rate: Some(140),
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "bp-elevated-boundary",
            bp: Some((130, 85)),
            expected_score: 1,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "bp-high-boundary",
            bp: Some((140, 90)),
            expected_score: 3,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "bp-just-under-severe",
            bp: Some((159, 109)),
            expected_score: 3,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "bp-severe-boundary",
            bp: Some((160, 100)),
            expected_score: 4,
            expected_level: RiskLevel::Moderate,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "hypotension",
            bp: Some((85, 55)),
            expected_score: 2,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "anemia-mild-boundary",
            hemoglobin: Some(10.9),
            expected_score: 1,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "anemia-severe",
            hemoglobin: Some(6.9),
            expected_score: 4,
            expected_level: RiskLevel::Moderate,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "sugar-takes-worst-reading",
            blood_sugar_fasting: Some(130.0),
            blood_sugar_random: Some(150.0),
            expected_score: 3,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "teen-pregnancy",
            age: 17,
            expected_score: 2,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "advanced-maternal-age",
            age: 41,
            expected_score: 3,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "danger-signs-stack",
            swelling: true,
            headache: true,
            blurred_vision: true,
            expected_score: 7,
            expected_level: RiskLevel::Severe,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "fetal-distress",
            fetal_heart_rate: Some(170),
            fetal_movement: Some(false),
            expected_score: 6,
            expected_level: RiskLevel::Moderate,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "low-spo2",
            spo2: Some(94),
            expected_score: 2,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "albumin-two-plus",
            urine_albumin: Some("++"),
            expected_score: 3,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "albumin-single-plus-ignored",
            urine_albumin: Some("+"),
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "moderate-mix",
            bp: Some((145, 92)),
            hemoglobin: Some(10.5),
            expected_score: 4,
            expected_level: RiskLevel::Moderate,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "eclampsia-warning-picture",
            bp: Some((162, 112)),
            urine_albumin: Some("+++"),
            headache: true,
            blurred_vision: true,
            expected_score: 12,
            expected_level: RiskLevel::Severe,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "worst-case-stack",
            age: 42,
            previous_complications: true,
            bp: Some((165, 110)),
            hemoglobin: Some(6.5),
            bleeding: true,
            expected_score: 18,
            expected_level: RiskLevel::Severe,
            ..GoldenCase::default()
        },
        GoldenCase {
            id: "abdominal-pain-alone",
            abdominal_pain: true,
            expected_score: 3,
            ..GoldenCase::default()
        },
    ]
}

fn build_case(case: &GoldenCase) -> (Observation, Patient) {
    let mut patient = Patient::new(format!("MR-{}", case.id), "Golden Patient".into(), case.age);
    patient.has_previous_complications = case.previous_complications;

    let mut obs = Observation::new(patient.id.clone(), "anm-1".into());
    if let Some((systolic, diastolic)) = case.bp {
        obs.bp_systolic = Some(systolic);
        obs.bp_diastolic = Some(diastolic);
    }
    obs.hemoglobin = case.hemoglobin;
    obs.blood_sugar_fasting = case.blood_sugar_fasting;
    obs.blood_sugar_random = case.blood_sugar_random;
    obs.spo2 = case.spo2;
    obs.fetal_heart_rate = case.fetal_heart_rate;
    obs.fetal_movement = case.fetal_movement;
    obs.urine_albumin = case.urine_albumin.map(String::from);
    if case.bleeding {
        obs.bleeding_reported = Some(true);
    }
    if case.swelling {
        obs.swelling_observed = Some(true);
    }
    if case.headache {
        obs.headache_reported = Some(true);
    }
    if case.blurred_vision {
        obs.blurred_vision_reported = Some(true);
    }
    if case.abdominal_pain {
        obs.abdominal_pain_reported = Some(true);
    }
    (obs, patient)
}

#[test]
fn test_golden_cases() {
    let policy = EscalationPolicy::new();

    for case in get_golden_cases() {
        let (obs, patient) = build_case(&case);
        let (total, factors) = score(&obs, &patient);

        assert_eq!(
            total, case.expected_score,
            "Case {}: score mismatch (factors: {:?})",
            case.id, factors
        );
        assert_eq!(
            policy.classify(total),
            case.expected_level,
            "Case {}: level mismatch for score {}",
            case.id,
            total
        );
    }
}

#[test]
fn test_factor_strings_name_the_findings() {
    let case = GoldenCase {
        id: "worst-case-stack",
        age: 42,
        previous_complications: true,
        bp: Some((165, 110)),
        hemoglobin: Some(6.5),
        bleeding: true,
        ..GoldenCase::default()
    };
    let (obs, patient) = build_case(&case);
    let (_, factors) = score(&obs, &patient);

    assert_eq!(
        factors,
        vec![
            "Severe Hypertension (BP: 165/110)".to_string(),
            "Severe Anemia (Hb: 6.5 g/dL)".to_string(),
            "High Risk Age Group (42 years)".to_string(),
            "History of Previous Complications".to_string(),
            "Vaginal Bleeding Reported".to_string(),
        ]
    );
}

#[test]
fn test_every_factor_is_justified_by_points() {
    // A clean observation produces neither points nor factors
    let case = GoldenCase::default();
    let (obs, patient) = build_case(&case);
    let (total, factors) = score(&obs, &patient);
    assert_eq!(total, 0);
    assert!(factors.is_empty());

    // And each golden case yields at least one factor per point bucket
    for case in get_golden_cases() {
        let (obs, patient) = build_case(&case);
        let (total, factors) = score(&obs, &patient);
        assert_eq!(
            total == 0,
            factors.is_empty(),
            "Case {}: factors and score disagree",
            case.id
        );
    }
}

#[test]
fn test_default_thresholds_partition_scores() {
    let policy = EscalationPolicy::new();
    for score in 0..=3u32 {
        assert_eq!(policy.classify(score), RiskLevel::Stable, "score {}", score);
    }
    for score in 4..=6u32 {
        assert_eq!(policy.classify(score), RiskLevel::Moderate, "score {}", score);
    }
    for score in 7..=30u32 {
        assert_eq!(policy.classify(score), RiskLevel::Severe, "score {}", score);
    }
}
