//! Signed-in user context

use serde::Deserialize;
use serde::Serialize;

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Member,
    #[default]
    Viewer,
}

/// The slice of session state that grid functions need.
///
/// Read once at the top of a call chain and passed down explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    /// Returns `true` if the user may edit cells.
    pub fn can_edit(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Member)
    }
}
