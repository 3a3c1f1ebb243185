//! Staff user database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{StaffRole, User};

impl Database {
    /// Insert a new staff user.
    pub fn insert_user(&self, user: &User) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO users (id, name, role, phone, email, active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                user.id,
                user.name,
                role_to_string(user.role),
                user.phone,
                user.email,
                user.active,
                user.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a user by ID.
    pub fn get_user(&self, id: &str) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, role, phone, email, active, created_at
                FROM users
                WHERE id = ?
                "#,
                [id],
                map_user_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List active users holding a role, oldest account first.
    pub fn find_active_users_by_role(&self, role: StaffRole) -> DbResult<Vec<User>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, role, phone, email, active, created_at
            FROM users
            WHERE role = ? AND active = 1
            ORDER BY created_at
            "#,
        )?;

        let rows = stmt.query_map([role_to_string(role)], map_user_row)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?.try_into()?);
        }
        Ok(users)
    }

    /// Deactivate a user (inactive users are never assigned work).
    pub fn deactivate_user(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("UPDATE users SET active = 0 WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct UserRow {
    id: String,
    name: String,
    role: String,
    phone: Option<String>,
    email: Option<String>,
    active: bool,
    created_at: String,
}

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        active: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            role: string_to_role(&row.role)?,
            phone: row.phone,
            email: row.email,
            active: row.active,
            created_at: row.created_at,
        })
    }
}

fn role_to_string(role: StaffRole) -> &'static str {
    match role {
        StaffRole::Admin => "admin",
        StaffRole::MedicalOfficer => "medical_officer",
        StaffRole::MchOfficer => "mch_officer",
        StaffRole::Doctor => "doctor",
        StaffRole::HelpDesk => "help_desk",
    }
}

fn string_to_role(s: &str) -> Result<StaffRole, DbError> {
    match s {
        "admin" => Ok(StaffRole::Admin),
        "medical_officer" => Ok(StaffRole::MedicalOfficer),
        "mch_officer" => Ok(StaffRole::MchOfficer),
        "doctor" => Ok(StaffRole::Doctor),
        "help_desk" => Ok(StaffRole::HelpDesk),
        _ => Err(DbError::Constraint(format!("Unknown staff role: {}", s))),
    }
}
