// Operator-facing view of customer and staff accounts (`admin/users`).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CellValue, Column, Resource, RowId};

/// An account as returned by the admin users endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RowId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl User {
    pub fn badge(&self) -> RoleBadge {
        RoleBadge::classify(&self.role)
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_active { "Active" } else { "Inactive" }
    }
}

/// Display bucket for a user's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleBadge {
    Admin,
    Moderator,
    User,
}

impl RoleBadge {
    /// Case-insensitive; anything unrecognized is a plain user.
    pub fn classify(role: &str) -> Self {
        match role.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "moderator" => Self::Moderator,
            _ => Self::User,
        }
    }
}

impl fmt::Display for RoleBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::User => "user",
        })
    }
}

/// The users collection.
pub struct Users;

const COLUMNS: &[Column] = &[
    Column::numeric("id", "ID"),
    Column::text("name", "Name"),
    Column::text("email", "Email"),
    Column::text("phone", "Phone"),
    Column::text("role", "Role"),
    Column::text("status", "Status"),
];

impl Resource for Users {
    type Row = User;

    const ENDPOINT: &'static str = "admin/users";
    const LABEL: &'static str = "users";

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn row_id(row: &User) -> RowId {
        row.id
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn cell(row: &User, key: &str) -> CellValue {
        match key {
            "id" => CellValue::Number(row.id as f64),
            "name" => CellValue::text(&row.name),
            "email" => CellValue::text(&row.email),
            "phone" => CellValue::opt_text(row.phone.as_deref()),
            "role" => CellValue::text(&row.role),
            "status" => CellValue::text(row.status_label()),
            _ => CellValue::Empty,
        }
    }

    fn can_delete(row: &User) -> bool {
        row.badge() != RoleBadge::Admin
    }
}
