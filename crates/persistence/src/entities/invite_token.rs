//! Invite token entity (database row mapping).

use domain::models::InviteToken;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the group_invite_tokens table.
#[derive(Debug, Clone, FromRow)]
pub struct InviteTokenEntity {
    pub token: String,
    pub group_id: Uuid,
    pub uses_left: i32,
}

impl From<InviteTokenEntity> for InviteToken {
    fn from(entity: InviteTokenEntity) -> Self {
        Self {
            token: entity.token,
            group_id: entity.group_id,
            uses_left: entity.uses_left,
        }
    }
}
