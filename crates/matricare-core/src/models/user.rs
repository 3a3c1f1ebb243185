//! Staff directory models.

use serde::{Deserialize, Serialize};

/// Role of a staff member, used when resolving follow-up assignees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StaffRole {
    /// System administrator
    Admin,
    /// Medical officer
    MedicalOfficer,
    /// Maternal and child health officer
    MchOfficer,
    /// Doctor
    Doctor,
    /// Help desk caller (default assignee for consultation follow-ups)
    HelpDesk,
}

/// A staff member who performs checks, receives assignments, and
/// acknowledges alerts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Local UUID
    pub id: String,
    /// Display name
    pub name: String,
    /// Staff role
    pub role: StaffRole,
    /// Contact number
    pub phone: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Whether this account is active (inactive users are never assigned)
    pub active: bool,
    /// Creation timestamp
    pub created_at: String,
}

impl User {
    /// Create a new active staff member.
    pub fn new(name: String, role: StaffRole) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            role,
            phone: None,
            email: None,
            active: true,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
