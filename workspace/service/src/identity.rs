use model::entities::{event, user};

use crate::error::{Result, ServiceError};

/// The authenticated caller, passed explicitly into every operation that checks rights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub email: String,
    pub name: String,
    pub is_superadmin: bool,
}

impl From<&user::Model> for Identity {
    fn from(user: &user::Model) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            is_superadmin: user.is_superadmin,
        }
    }
}

impl Identity {
    /// Owners and superadmins may modify or delete an event.
    pub fn can_manage(&self, event: &event::Model) -> bool {
        self.is_superadmin || event.created_by_id == self.user_id
    }

    pub fn ensure_can_manage(&self, event: &event::Model) -> Result<()> {
        if self.can_manage(event) {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(format!(
                "Only the owner or a superadmin can modify event {}",
                event.id
            )))
        }
    }

    pub fn ensure_superadmin(&self) -> Result<()> {
        if self.is_superadmin {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(
                "Superadmin rights required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event_owned_by(owner: i32) -> event::Model {
        event::Model {
            id: 7,
            name: "Gala".to_string(),
            description: None,
            date: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(19, 0, 0)
                .unwrap(),
            location: "Hall".to_string(),
            created_by_id: owner,
        }
    }

    fn identity(user_id: i32, is_superadmin: bool) -> Identity {
        Identity {
            user_id,
            email: format!("user{}@example.com", user_id),
            name: "User".to_string(),
            is_superadmin,
        }
    }

    #[test]
    fn test_owner_and_superadmin_can_manage() {
        let event = event_owned_by(1);
        assert!(identity(1, false).can_manage(&event));
        assert!(identity(2, true).can_manage(&event));
        assert!(!identity(2, false).can_manage(&event));
    }

    #[test]
    fn test_denied_caller_gets_permission_error() {
        let event = event_owned_by(1);
        let err = identity(3, false).ensure_can_manage(&event).unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));
        assert!(identity(3, false).ensure_superadmin().is_err());
    }
}
