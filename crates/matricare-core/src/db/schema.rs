//! SQLite schema definition.

/// Complete database schema for matricare.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Staff Users
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    role TEXT NOT NULL,                          -- admin, medical_officer, mch_officer, doctor, help_desk
    phone TEXT,
    email TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);
CREATE INDEX IF NOT EXISTS idx_users_active ON users(active);

-- ============================================================================
-- Patients (with current risk snapshot)
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    mother_id TEXT NOT NULL UNIQUE,              -- registry number
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    mobile_number TEXT,
    village TEXT,
    district TEXT,
    lmp_date TEXT,
    edd_date TEXT,
    gravida INTEGER,
    para INTEGER,
    blood_group TEXT,
    has_previous_complications INTEGER NOT NULL DEFAULT 0,
    previous_complications_details TEXT,
    medical_history TEXT,
    current_risk_score INTEGER NOT NULL DEFAULT 0,
    current_risk_level TEXT NOT NULL DEFAULT 'stable',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_mother_id ON patients(mother_id);
CREATE INDEX IF NOT EXISTS idx_patients_risk_level ON patients(current_risk_level);

-- ============================================================================
-- Observations (clinical checks, scored)
-- ============================================================================

CREATE TABLE IF NOT EXISTS observations (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    performed_by TEXT NOT NULL REFERENCES users(id),
    check_date TEXT NOT NULL,
    bp_systolic INTEGER,
    bp_diastolic INTEGER,
    pulse_rate INTEGER,
    temperature REAL,
    respiratory_rate INTEGER,
    spo2 INTEGER,
    hemoglobin REAL,
    blood_sugar_fasting REAL,
    blood_sugar_pp REAL,
    blood_sugar_random REAL,
    weight_kg REAL,
    height_cm REAL,
    fundal_height_cm REAL,
    fetal_heart_rate INTEGER,
    fetal_movement INTEGER,
    urine_albumin TEXT,
    urine_sugar TEXT,
    symptoms TEXT,
    swelling_observed INTEGER,
    bleeding_reported INTEGER,
    headache_reported INTEGER,
    blurred_vision_reported INTEGER,
    abdominal_pain_reported INTEGER,
    risk_score INTEGER NOT NULL DEFAULT 0,
    risk_level TEXT NOT NULL DEFAULT 'stable',
    risk_factors TEXT,                           -- semicolon-joined factor list
    notes TEXT,
    recommendations TEXT,
    next_check_date TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_observations_patient ON observations(patient_id);
CREATE INDEX IF NOT EXISTS idx_observations_check_date ON observations(check_date);
CREATE INDEX IF NOT EXISTS idx_observations_risk_level ON observations(risk_level);

-- ============================================================================
-- Alerts (append-only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS alerts (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    observation_id TEXT REFERENCES observations(id),
    category TEXT NOT NULL,                      -- high_risk_detected, complication_reported
    severity TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    risk_factors TEXT,
    recommended_action TEXT,
    acknowledged INTEGER NOT NULL DEFAULT 0,
    acknowledged_by TEXT REFERENCES users(id),
    acknowledged_at TEXT,
    acknowledgement_notes TEXT,
    action_taken TEXT,
    resolved INTEGER NOT NULL DEFAULT 0,
    resolved_at TEXT,
    resolution_notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_alerts_patient ON alerts(patient_id);
CREATE INDEX IF NOT EXISTS idx_alerts_severity ON alerts(severity);
CREATE INDEX IF NOT EXISTS idx_alerts_acknowledged ON alerts(acknowledged);
CREATE INDEX IF NOT EXISTS idx_alerts_created ON alerts(created_at);

-- ============================================================================
-- Follow-up Tasks
-- ============================================================================

CREATE TABLE IF NOT EXISTS follow_ups (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    assigned_to TEXT NOT NULL REFERENCES users(id),
    scheduled_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',      -- pending, completed, no_answer, rescheduled, cancelled
    call_attempted_at TEXT,
    call_completed_at TEXT,
    call_duration_seconds INTEGER,
    attempt_count INTEGER NOT NULL DEFAULT 0,
    patient_condition TEXT,
    symptoms_reported TEXT,
    medication_compliance INTEGER,
    concerns_raised TEXT,
    advice_given TEXT,
    requires_doctor_consultation INTEGER NOT NULL DEFAULT 0,
    requires_immediate_attention INTEGER NOT NULL DEFAULT 0,
    notes TEXT,
    photo_url TEXT,
    next_follow_up_date TEXT,
    triggered_by_observation TEXT REFERENCES observations(id),
    triggered_by_consultation TEXT,              -- external subsystem id, no FK
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_follow_ups_patient ON follow_ups(patient_id);
CREATE INDEX IF NOT EXISTS idx_follow_ups_assigned ON follow_ups(assigned_to);
CREATE INDEX IF NOT EXISTS idx_follow_ups_date ON follow_ups(scheduled_date);
CREATE INDEX IF NOT EXISTS idx_follow_ups_status ON follow_ups(status);
"#;
