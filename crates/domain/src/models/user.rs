//! User domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Capabilities a user holds inside their group.
///
/// Founders receive all of them; users who join through an invite get none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserPermissions {
    pub can_invite: bool,
    pub can_manage: bool,
    pub can_organize: bool,
}

impl UserPermissions {
    /// Permissions derived from whether the user founded their group.
    pub fn for_registration(founded_group: bool) -> Self {
        Self {
            can_invite: founded_group,
            can_manage: founded_group,
            can_organize: founded_group,
        }
    }

    /// Full founding permissions.
    pub fn founder() -> Self {
        Self::for_registration(true)
    }

    /// Permissions for a user who joined an existing group.
    pub fn member() -> Self {
        Self::for_registration(false)
    }

    pub fn is_founder(&self) -> bool {
        self.can_invite && self.can_manage && self.can_organize
    }
}

/// A persisted user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    pub group_id: Uuid,
    pub group_name: String,
    pub advanced: bool,
    #[serde(flatten)]
    pub permissions: UserPermissions,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
    pub group_id: Uuid,
    pub group_name: String,
    pub advanced: bool,
    pub permissions: UserPermissions,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "cook@example.com".to_string(),
            username: "cook".to_string(),
            full_name: "cook".to_string(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$ZGlnZXN0".to_string(),
            group_id: Uuid::new_v4(),
            group_name: "Kitchen".to_string(),
            advanced: false,
            permissions: UserPermissions::founder(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_permissions_for_founder() {
        let perms = UserPermissions::for_registration(true);
        assert!(perms.can_invite && perms.can_manage && perms.can_organize);
        assert!(perms.is_founder());
    }

    #[test]
    fn test_permissions_for_member() {
        let perms = UserPermissions::for_registration(false);
        assert!(!perms.can_invite && !perms.can_manage && !perms.can_organize);
        assert_eq!(perms, UserPermissions::default());
    }

    #[test]
    fn test_user_serialization_skips_password_hash() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "cook");
    }

    #[test]
    fn test_user_serialization_flattens_permissions() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert_eq!(json["can_invite"], true);
        assert_eq!(json["can_manage"], true);
        assert_eq!(json["can_organize"], true);
        assert!(json.get("permissions").is_none());
    }
}
