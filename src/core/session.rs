//! Signed-in user context handed to a booking form at construction
//!
//! The form never reads ambient state to learn who is working on it; the
//! session carries role, branch and permissions explicitly.

use crate::core::error::PreconditionError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permission required to create a booking
pub const PERM_BOOKING_CREATE: &str = "bookings.create";

/// Permission required to update an existing booking
pub const PERM_BOOKING_UPDATE: &str = "bookings.update";

/// Role that implicitly holds every permission
pub const ROLE_ADMIN: &str = "admin";

/// The signed-in back-office user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Uuid,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub branch_id: Option<Uuid>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Session {
    pub fn new(user_id: Uuid, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            role: role.into(),
            branch_id: None,
            permissions: Vec::new(),
        }
    }

    pub fn with_branch(mut self, branch_id: Uuid) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    /// Check if session represents an admin
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_admin() || self.permissions.iter().any(|p| p == permission)
    }

    /// Fail with [`PreconditionError::PermissionDenied`] unless the permission is held
    pub fn require(&self, permission: &str) -> Result<(), PreconditionError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(PreconditionError::PermissionDenied {
                permission: permission.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_holds_every_permission() {
        let session = Session::new(Uuid::new_v4(), "Root", ROLE_ADMIN);
        assert!(session.has_permission(PERM_BOOKING_CREATE));
        assert!(session.has_permission(PERM_BOOKING_UPDATE));
    }

    #[test]
    fn test_agent_needs_explicit_permission() {
        let session =
            Session::new(Uuid::new_v4(), "Asha", "agent").with_permissions([PERM_BOOKING_CREATE]);

        assert!(session.require(PERM_BOOKING_CREATE).is_ok());
        assert_eq!(
            session.require(PERM_BOOKING_UPDATE),
            Err(PreconditionError::PermissionDenied {
                permission: PERM_BOOKING_UPDATE.to_string()
            })
        );
    }

    #[test]
    fn test_session_deserializes_camel_case() {
        let json = serde_json::json!({
            "userId": Uuid::nil(),
            "name": "Asha",
            "role": "agent",
            "branchId": Uuid::nil(),
        });
        let session: Session = serde_json::from_value(json).unwrap();
        assert_eq!(session.branch_id, Some(Uuid::nil()));
        assert!(session.permissions.is_empty());
    }
}
