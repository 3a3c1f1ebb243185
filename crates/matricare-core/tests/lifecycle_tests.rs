//! Follow-up lifecycle tests across the intake and call services.

use chrono::NaiveDate;
use matricare_core::care::{AlertManager, EscalationEngine, FollowUpManager};
use matricare_core::db::Database;
use matricare_core::models::{
    AlertCategory, FollowUpOutcome, FollowUpStatus, ObservationInput, Patient, StaffRole, User,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> (Database, Patient, User) {
    let db = Database::open_in_memory().unwrap();
    let anm = User::new("Meena".into(), StaffRole::MchOfficer);
    db.insert_user(&anm).unwrap();
    let patient = Patient::new("MR-5001".into(), "Rekha".into(), 26);
    db.insert_patient(&patient).unwrap();
    (db, patient, anm)
}

#[test]
fn test_auto_follow_up_call_reports_complication() {
    let (db, patient, anm) = setup();
    let engine = EscalationEngine::new(&db);
    let manager = FollowUpManager::new(&db);

    // Severe intake schedules the call automatically
    let mut input = ObservationInput::new(patient.id.clone());
    input.bp_systolic = Some(170);
    input.bp_diastolic = Some(115);
    input.bleeding_reported = Some(true);
    engine.record_observation(&input, &anm.id).unwrap();

    let task = db.list_follow_ups_for_patient(&patient.id).unwrap().remove(0);
    assert_eq!(task.status, FollowUpStatus::Pending);

    // The caller reaches the patient and hears an alarming report
    let outcome = FollowUpOutcome {
        patient_condition: Some("worse".into()),
        symptoms_reported: Some("continued bleeding, dizziness".into()),
        requires_immediate_attention: true,
        requires_doctor_consultation: true,
        ..FollowUpOutcome::default()
    };
    manager.update(&task.id, FollowUpStatus::Completed, &outcome).unwrap();

    // Intake alert plus the complication alert from the call
    let alerts = db.list_alerts_for_patient(&patient.id).unwrap();
    assert_eq!(alerts.len(), 2);
    let categories: Vec<_> = alerts.iter().map(|a| a.category).collect();
    assert!(categories.contains(&AlertCategory::HighRiskDetected));
    assert!(categories.contains(&AlertCategory::ComplicationReported));

    let complication = alerts
        .iter()
        .find(|a| a.category == AlertCategory::ComplicationReported)
        .unwrap();
    assert_eq!(complication.title, "URGENT: Patient Requires Immediate Attention");
    assert!(complication.description.contains("continued bleeding"));
    assert!(complication.observation_id.is_none());
}

#[test]
fn test_chained_calls_continue_until_no_next_date() {
    let (db, patient, anm) = setup();
    let manager = FollowUpManager::new(&db);

    let first = manager
        .schedule(&patient.id, &anm.id, date(2025, 5, 1), None, None)
        .unwrap();

    let chain_outcome = FollowUpOutcome {
        patient_condition: Some("stable".into()),
        next_follow_up_date: Some(date(2025, 5, 8)),
        ..FollowUpOutcome::default()
    };
    manager.update(&first.id, FollowUpStatus::Completed, &chain_outcome).unwrap();

    let tasks = manager.for_patient(&patient.id).unwrap();
    assert_eq!(tasks.len(), 2);
    let second = tasks.iter().find(|t| t.status == FollowUpStatus::Pending).unwrap();
    assert_eq!(second.scheduled_date, date(2025, 5, 8));

    // Closing the chained call without a next date ends the chain
    manager
        .update(&second.id, FollowUpStatus::Completed, &FollowUpOutcome::default())
        .unwrap();
    let tasks = manager.for_patient(&patient.id).unwrap();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t.status == FollowUpStatus::Completed));
}

#[test]
fn test_due_and_overdue_queries_skip_terminal_tasks() {
    let (db, patient, anm) = setup();
    let manager = FollowUpManager::new(&db);

    let monday = manager
        .schedule(&patient.id, &anm.id, date(2025, 6, 2), None, None)
        .unwrap();
    let tuesday = manager
        .schedule(&patient.id, &anm.id, date(2025, 6, 3), None, None)
        .unwrap();
    let wednesday = manager
        .schedule(&patient.id, &anm.id, date(2025, 6, 4), None, None)
        .unwrap();

    manager.cancel(&tuesday.id).unwrap();

    let due_monday = manager.due_on(date(2025, 6, 2)).unwrap();
    assert_eq!(due_monday.len(), 1);
    assert_eq!(due_monday[0].id, monday.id);

    // As of Friday, the cancelled Tuesday task is not overdue
    let overdue = manager.overdue(date(2025, 6, 6)).unwrap();
    let ids: Vec<_> = overdue.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, vec![monday.id.clone(), wednesday.id.clone()]);

    // Completing Monday's call removes it too
    manager
        .update(&monday.id, FollowUpStatus::Completed, &FollowUpOutcome::default())
        .unwrap();
    let overdue = manager.overdue(date(2025, 6, 6)).unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id, wednesday.id);
}

#[test]
fn test_rescheduled_task_keeps_history_through_completion() {
    let (db, patient, anm) = setup();
    let manager = FollowUpManager::new(&db);

    let task = manager
        .schedule(&patient.id, &anm.id, date(2025, 6, 10), Some("first try".into()), None)
        .unwrap();

    manager
        .update(&task.id, FollowUpStatus::NoAnswer, &FollowUpOutcome::default())
        .unwrap();
    manager.reschedule(&task.id, date(2025, 6, 12)).unwrap();
    manager
        .update(&task.id, FollowUpStatus::NoAnswer, &FollowUpOutcome::default())
        .unwrap();
    manager.reschedule(&task.id, date(2025, 6, 14)).unwrap();

    let outcome = FollowUpOutcome {
        patient_condition: Some("reached at last".into()),
        call_duration_seconds: Some(300),
        ..FollowUpOutcome::default()
    };
    let done = manager.update(&task.id, FollowUpStatus::Completed, &outcome).unwrap();

    assert_eq!(done.attempt_count, 3);
    assert_eq!(done.scheduled_date, date(2025, 6, 14));
    assert_eq!(done.patient_condition, Some("reached at last".into()));
}

#[test]
fn test_complication_alert_feeds_staff_workflow() {
    let (db, patient, anm) = setup();
    let manager = FollowUpManager::new(&db);
    let alerts = AlertManager::new(&db);
    let doctor = User::new("Dr. Rao".into(), StaffRole::Doctor);
    db.insert_user(&doctor).unwrap();

    let task = manager
        .schedule(&patient.id, &anm.id, date(2025, 6, 20), None, None)
        .unwrap();
    let outcome = FollowUpOutcome {
        requires_immediate_attention: true,
        ..FollowUpOutcome::default()
    };
    manager.update(&task.id, FollowUpStatus::Completed, &outcome).unwrap();

    let raised = alerts.unacknowledged().unwrap();
    assert_eq!(raised.len(), 1);

    alerts
        .acknowledge(&raised[0].id, &doctor.id, None, Some("called patient back".into()))
        .unwrap();
    assert!(alerts.unacknowledged().unwrap().is_empty());

    alerts.resolve(&raised[0].id, Some("admitted for observation".into())).unwrap();
    assert!(alerts.unresolved_for_patient(&patient.id).unwrap().is_empty());
}
