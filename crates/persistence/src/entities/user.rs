//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{User, UserPermissions};
use sqlx::FromRow;
use uuid::Uuid;

/// A `users` row joined with the name of its group.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
    pub group_id: Uuid,
    pub group_name: String,
    pub advanced: bool,
    pub can_invite: bool,
    pub can_manage: bool,
    pub can_organize: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            username: entity.username,
            full_name: entity.full_name,
            password_hash: entity.password_hash,
            group_id: entity.group_id,
            group_name: entity.group_name,
            advanced: entity.advanced,
            permissions: UserPermissions {
                can_invite: entity.can_invite,
                can_manage: entity.can_manage,
                can_organize: entity.can_organize,
            },
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_entity_conversion() {
        let entity = UserEntity {
            id: Uuid::new_v4(),
            email: "cook@example.com".to_string(),
            username: "cook".to_string(),
            full_name: "Cook".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            group_id: Uuid::new_v4(),
            group_name: "Kitchen".to_string(),
            advanced: true,
            can_invite: false,
            can_manage: false,
            can_organize: false,
            created_at: Utc::now(),
        };

        let user: User = entity.into();
        assert_eq!(user.group_name, "Kitchen");
        assert_eq!(user.permissions, UserPermissions::member());
        assert!(user.advanced);
    }
}
