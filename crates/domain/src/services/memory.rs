//! In-memory store implementations.
//!
//! Each store guards its map with a single async mutex, so every trait method
//! is atomic with respect to the others. Used by tests and for running the
//! HTTP router without a database.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::stores::{GroupStore, InviteTokenStore, StoreError, UniqueField, UserStore};
use crate::models::{
    Group, InviteToken, NewGroup, NewInviteToken, NewUser, TokenConsumption, User,
};

/// In-memory [`GroupStore`].
#[derive(Debug, Default)]
pub struct InMemoryGroupStore {
    groups: Mutex<HashMap<Uuid, Group>>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.groups.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.groups.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl GroupStore for InMemoryGroupStore {
    async fn get(&self, id: Uuid) -> Result<Option<Group>, StoreError> {
        Ok(self.groups.lock().await.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Group>, StoreError> {
        Ok(self
            .groups
            .lock()
            .await
            .values()
            .find(|g| g.name == name)
            .cloned())
    }

    async fn create(&self, group: NewGroup) -> Result<Group, StoreError> {
        let mut groups = self.groups.lock().await;
        if groups.values().any(|g| g.name == group.name) {
            return Err(StoreError::UniqueViolation {
                field: UniqueField::GroupName,
            });
        }

        let created = Group {
            id: Uuid::new_v4(),
            name: group.name,
            preferences: group.preferences,
            created_at: Utc::now(),
        };
        groups.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.groups.lock().await.remove(&id).is_some())
    }
}

/// In-memory [`UserStore`]. Email uniqueness is case-insensitive.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation {
                field: UniqueField::Username,
            });
        }
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StoreError::UniqueViolation {
                field: UniqueField::Email,
            });
        }

        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            password_hash: user.password_hash,
            group_id: user.group_id,
            group_name: user.group_name,
            advanced: user.advanced,
            permissions: user.permissions,
            created_at: Utc::now(),
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.users.lock().await.remove(&id).is_some())
    }
}

/// In-memory [`InviteTokenStore`].
#[derive(Debug, Default)]
pub struct InMemoryInviteTokenStore {
    tokens: Mutex<HashMap<String, InviteToken>>,
}

impl InMemoryInviteTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tokens.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl InviteTokenStore for InMemoryInviteTokenStore {
    async fn get(&self, token: &str) -> Result<Option<InviteToken>, StoreError> {
        Ok(self.tokens.lock().await.get(token).cloned())
    }

    async fn create(&self, token: NewInviteToken) -> Result<InviteToken, StoreError> {
        if token.uses_left < 1 {
            return Err(StoreError::Backend(
                "invite token must have at least one use".to_string(),
            ));
        }

        let mut tokens = self.tokens.lock().await;
        if tokens.contains_key(&token.token) {
            return Err(StoreError::UniqueViolation {
                field: UniqueField::Token,
            });
        }

        let created = InviteToken {
            token: token.token,
            group_id: token.group_id,
            uses_left: token.uses_left,
        };
        tokens.insert(created.token.clone(), created.clone());
        Ok(created)
    }

    async fn consume(&self, token: &str) -> Result<TokenConsumption, StoreError> {
        let mut tokens = self.tokens.lock().await;
        let outcome = match tokens.get(token) {
            Some(entry) => TokenConsumption::after_use(entry.uses_left),
            None => TokenConsumption::Exhausted,
        };

        match outcome {
            TokenConsumption::Decremented { uses_left } => {
                if let Some(entry) = tokens.get_mut(token) {
                    entry.uses_left = uses_left;
                }
            }
            TokenConsumption::Retired | TokenConsumption::Exhausted => {
                tokens.remove(token);
            }
        }

        Ok(outcome)
    }

    async fn delete(&self, token: &str) -> Result<bool, StoreError> {
        Ok(self.tokens.lock().await.remove(token).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserPermissions;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
            full_name: username.to_string(),
            password_hash: "hash".to_string(),
            group_id: Uuid::new_v4(),
            group_name: "Kitchen".to_string(),
            advanced: false,
            permissions: UserPermissions::member(),
        }
    }

    fn new_token(token: &str, uses_left: i32) -> NewInviteToken {
        NewInviteToken {
            token: token.to_string(),
            group_id: Uuid::new_v4(),
            uses_left,
        }
    }

    #[tokio::test]
    async fn test_group_create_and_get() {
        let store = InMemoryGroupStore::new();
        let group = store
            .create(NewGroup::founded("Kitchen", true, false))
            .await
            .unwrap();

        assert_eq!(store.get(group.id).await.unwrap(), Some(group.clone()));
        assert_eq!(store.get_by_name("Kitchen").await.unwrap(), Some(group));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_group_name_conflict() {
        let store = InMemoryGroupStore::new();
        store
            .create(NewGroup::founded("Kitchen", false, false))
            .await
            .unwrap();
        let err = store
            .create(NewGroup::founded("Kitchen", true, true))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation {
                field: UniqueField::GroupName
            }
        ));
    }

    #[tokio::test]
    async fn test_group_delete() {
        let store = InMemoryGroupStore::new();
        let group = store
            .create(NewGroup::founded("Kitchen", false, false))
            .await
            .unwrap();
        assert!(store.delete(group.id).await.unwrap());
        assert!(!store.delete(group.id).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_user_uniqueness() {
        let store = InMemoryUserStore::new();
        store.create(new_user("ann", "ann@example.com")).await.unwrap();

        let err = store
            .create(new_user("ann", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation {
                field: UniqueField::Username
            }
        ));

        let err = store
            .create(new_user("bob", "ANN@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation {
                field: UniqueField::Email
            }
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_user_get_and_delete() {
        let store = InMemoryUserStore::new();
        let user = store.create(new_user("ann", "ann@example.com")).await.unwrap();
        assert_eq!(store.get_by_username("ann").await.unwrap(), Some(user.clone()));
        assert!(store.delete(user.id).await.unwrap());
        assert_eq!(store.get(user.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_token_consume_decrements() {
        let store = InMemoryInviteTokenStore::new();
        store.create(new_token("tok", 3)).await.unwrap();

        assert_eq!(
            store.consume("tok").await.unwrap(),
            TokenConsumption::Decremented { uses_left: 2 }
        );
        assert_eq!(store.get("tok").await.unwrap().unwrap().uses_left, 2);
    }

    #[tokio::test]
    async fn test_token_consume_retires_last_use() {
        let store = InMemoryInviteTokenStore::new();
        store.create(new_token("tok", 1)).await.unwrap();

        assert_eq!(store.consume("tok").await.unwrap(), TokenConsumption::Retired);
        assert_eq!(store.get("tok").await.unwrap(), None);
        assert_eq!(store.consume("tok").await.unwrap(), TokenConsumption::Exhausted);
    }

    #[tokio::test]
    async fn test_token_consume_unknown() {
        let store = InMemoryInviteTokenStore::new();
        assert_eq!(
            store.consume("missing").await.unwrap(),
            TokenConsumption::Exhausted
        );
    }

    #[tokio::test]
    async fn test_token_create_rejects_zero_uses() {
        let store = InMemoryInviteTokenStore::new();
        assert!(store.create(new_token("tok", 0)).await.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_token_duplicate() {
        let store = InMemoryInviteTokenStore::new();
        store.create(new_token("tok", 1)).await.unwrap();
        let err = store.create(new_token("tok", 2)).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation {
                field: UniqueField::Token
            }
        ));
    }

    #[tokio::test]
    async fn test_concurrent_consume_never_oversubscribes() {
        let store = std::sync::Arc::new(InMemoryInviteTokenStore::new());
        store.create(new_token("tok", 5)).await.unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..20 {
            let store = store.clone();
            tasks.spawn(async move { store.consume("tok").await.unwrap() });
        }

        let mut consumed = 0;
        while let Some(result) = tasks.join_next().await {
            if result.unwrap().consumed() {
                consumed += 1;
            }
        }
        assert_eq!(consumed, 5);
        assert!(store.is_empty().await);
    }
}
