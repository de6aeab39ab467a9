//! Keyed storage traits consumed by the registration workflow.
//!
//! Implementations live in the persistence crate (PostgreSQL) and in
//! [`super::memory`] (in-process, for tests and local runs).

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{Group, InviteToken, NewGroup, NewInviteToken, NewUser, TokenConsumption, User};

/// Field protected by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    GroupName,
    Username,
    Email,
    Token,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::GroupName => write!(f, "group name"),
            UniqueField::Username => write!(f, "username"),
            UniqueField::Email => write!(f, "email"),
            UniqueField::Token => write!(f, "token"),
        }
    }
}

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated on {field}")]
    UniqueViolation { field: UniqueField },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Groups keyed by id. A group and its preferences are written as one unit.
#[async_trait::async_trait]
pub trait GroupStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Group>, StoreError>;

    async fn get_by_name(&self, name: &str) -> Result<Option<Group>, StoreError>;

    /// Creates the group and its preferences atomically.
    async fn create(&self, group: NewGroup) -> Result<Group, StoreError>;

    /// Deletes the group and its preferences. Returns false if absent.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Users keyed by id; username and email are unique.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Invite tokens keyed by the token string.
#[async_trait::async_trait]
pub trait InviteTokenStore: Send + Sync {
    /// Reads a token without consuming it.
    async fn get(&self, token: &str) -> Result<Option<InviteToken>, StoreError>;

    async fn create(&self, token: NewInviteToken) -> Result<InviteToken, StoreError>;

    /// Takes one use of the token as a single atomic operation.
    ///
    /// Decrements `uses_left`, deleting the token when it reaches zero.
    /// Returns [`TokenConsumption::Exhausted`] when the token is gone, which
    /// includes the case where a concurrent caller took the last use.
    async fn consume(&self, token: &str) -> Result<TokenConsumption, StoreError>;

    async fn delete(&self, token: &str) -> Result<bool, StoreError>;
}
