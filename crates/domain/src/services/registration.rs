//! User registration workflow.
//!
//! A registration either founds a new group, making the user its founder, or
//! joins an existing group through an invite token. The token is only read
//! while resolving the group; one use is taken atomically after the user
//! exists, so a failed user insert never spends a use.
//!
//! The workflow runs on its own task, so it completes with its token use and
//! any compensation even when the caller stops waiting for it.
//!
//! Failure after a write is compensated:
//! - user creation fails after founding a group: the group is deleted;
//! - the token turns out to be exhausted (a concurrent registration took the
//!   last use) or cannot be consumed: the new user is deleted.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn, Instrument};

use super::events::{NotifyResult, UserCreatedEvent, UserEventNotifier};
use super::hashing::PasswordHasher;
use super::stores::{GroupStore, InviteTokenStore, StoreError, UniqueField, UserStore};
use crate::models::{
    Group, InvalidRegistration, InviteToken, NewGroup, NewUser, Registration, RegistrationRequest,
    RegistrationTarget, TokenConsumption, User, UserPermissions,
};
use shared::password::PasswordError;

/// Errors returned by [`RegistrationService::register`].
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Invalid registration request: {0}")]
    InvalidRequest(String),

    #[error("Invalid group token")]
    InvalidToken,

    #[error("Group name already exists")]
    GroupNameConflict,

    #[error("Username already taken")]
    UsernameConflict,

    #[error("Email already registered")]
    EmailConflict,

    #[error("Invite token was used up by a concurrent registration")]
    TokenExhaustedRace,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Registration task failed: {0}")]
    Interrupted(String),
}

impl From<StoreError> for RegistrationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation {
                field: UniqueField::GroupName,
            } => RegistrationError::GroupNameConflict,
            StoreError::UniqueViolation {
                field: UniqueField::Username,
            } => RegistrationError::UsernameConflict,
            StoreError::UniqueViolation {
                field: UniqueField::Email,
            } => RegistrationError::EmailConflict,
            other => RegistrationError::Store(other),
        }
    }
}

impl From<InvalidRegistration> for RegistrationError {
    fn from(err: InvalidRegistration) -> Self {
        RegistrationError::InvalidRequest(err.to_string())
    }
}

impl RegistrationError {
    /// Metric label for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistrationError::InvalidRequest(_) => "invalid_request",
            RegistrationError::InvalidToken => "invalid_token",
            RegistrationError::GroupNameConflict => "group_name_conflict",
            RegistrationError::UsernameConflict => "username_conflict",
            RegistrationError::EmailConflict => "email_conflict",
            RegistrationError::TokenExhaustedRace => "token_exhausted",
            RegistrationError::Password(_) => "password_error",
            RegistrationError::Store(_) => "store_error",
            RegistrationError::Interrupted(_) => "interrupted",
        }
    }
}

/// Orchestrates group founding or joining, user creation and token use.
///
/// Holds no state between calls besides its collaborators.
#[derive(Clone)]
pub struct RegistrationService {
    groups: Arc<dyn GroupStore>,
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn InviteTokenStore>,
    hasher: Arc<dyn PasswordHasher>,
    notifier: Arc<dyn UserEventNotifier>,
    allow_group_creation: bool,
}

impl RegistrationService {
    pub fn new(
        groups: Arc<dyn GroupStore>,
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn InviteTokenStore>,
        hasher: Arc<dyn PasswordHasher>,
        notifier: Arc<dyn UserEventNotifier>,
    ) -> Self {
        Self {
            groups,
            users,
            tokens,
            hasher,
            notifier,
            allow_group_creation: true,
        }
    }

    /// Enables or disables founding new groups through registration.
    pub fn with_group_creation(mut self, allowed: bool) -> Self {
        self.allow_group_creation = allowed;
        self
    }

    /// Validates a wire request and registers it.
    pub async fn register_request(
        &self,
        request: RegistrationRequest,
    ) -> Result<User, RegistrationError> {
        let registration = Registration::try_from(request)?;
        self.register(registration).await
    }

    /// Registers a user, founding or joining a group as requested.
    ///
    /// Dropping the returned future does not abort the registration once it
    /// has been accepted; the spawned workflow still runs to completion.
    pub async fn register(&self, registration: Registration) -> Result<User, RegistrationError> {
        registration.target.check()?;

        let service = self.clone();
        tokio::spawn(async move { service.run(registration).await }.in_current_span())
            .await
            .map_err(|e| RegistrationError::Interrupted(e.to_string()))?
    }

    #[tracing::instrument(skip_all, fields(username = %registration.username))]
    async fn run(&self, registration: Registration) -> Result<User, RegistrationError> {
        info!("Registering user");

        let is_new_group = registration.target.is_new_group();
        let (group, invite) = match &registration.target {
            RegistrationTarget::FoundGroup { name, private } => {
                let group = self
                    .found_group(name, *private, registration.advanced)
                    .await?;
                (group, None)
            }
            RegistrationTarget::JoinGroup { token } => {
                let (group, invite) = self.resolve_invite(token).await?;
                (group, Some(invite))
            }
        };

        let user = match self.create_user(&registration, &group, is_new_group).await {
            Ok(user) => user,
            Err(err) => {
                if is_new_group {
                    self.discard_group(&group).await;
                }
                return Err(err);
            }
        };

        if let Some(invite) = invite {
            self.consume_invite(&invite, &user).await?;
        }

        self.notify(&user, is_new_group).await;

        info!(user_id = %user.id, group_id = %group.id, "User registered");
        Ok(user)
    }

    async fn found_group(
        &self,
        name: &str,
        private: bool,
        advanced: bool,
    ) -> Result<Group, RegistrationError> {
        if !self.allow_group_creation {
            return Err(RegistrationError::InvalidRequest(
                "Group creation is disabled".to_string(),
            ));
        }

        let group = self
            .groups
            .create(NewGroup::founded(name, private, advanced))
            .await?;

        info!(group_id = %group.id, group_name = %group.name, private, "Group founded");
        Ok(group)
    }

    async fn resolve_invite(&self, token: &str) -> Result<(Group, InviteToken), RegistrationError> {
        let invite = self
            .tokens
            .get(token)
            .await?
            .ok_or(RegistrationError::InvalidToken)?;

        let group = match self.groups.get(invite.group_id).await? {
            Some(group) => group,
            None => {
                warn!(
                    token = %invite.redacted(),
                    group_id = %invite.group_id,
                    "Invite token references a missing group"
                );
                return Err(RegistrationError::InvalidToken);
            }
        };

        debug!(token = %invite.redacted(), group_id = %group.id, "Invite token resolved");
        Ok((group, invite))
    }

    async fn create_user(
        &self,
        registration: &Registration,
        group: &Group,
        is_new_group: bool,
    ) -> Result<User, RegistrationError> {
        let hasher = self.hasher.clone();
        let password = registration.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| RegistrationError::Interrupted(e.to_string()))??;

        let new_user = NewUser {
            email: registration.email.clone(),
            username: registration.username.clone(),
            full_name: registration.full_name.clone(),
            password_hash,
            group_id: group.id,
            group_name: group.name.clone(),
            advanced: registration.advanced,
            permissions: UserPermissions::for_registration(is_new_group),
        };

        Ok(self.users.create(new_user).await?)
    }

    async fn consume_invite(&self, invite: &InviteToken, user: &User) -> Result<(), RegistrationError> {
        match self.tokens.consume(&invite.token).await {
            Ok(TokenConsumption::Decremented { uses_left }) => {
                debug!(token = %invite.redacted(), uses_left, "Invite token used");
                Ok(())
            }
            Ok(TokenConsumption::Retired) => {
                info!(token = %invite.redacted(), "Invite token used up and deleted");
                Ok(())
            }
            Ok(TokenConsumption::Exhausted) => {
                warn!(
                    token = %invite.redacted(),
                    user_id = %user.id,
                    "Invite token exhausted by a concurrent registration"
                );
                self.discard_user(user).await;
                Err(RegistrationError::TokenExhaustedRace)
            }
            Err(err) => {
                error!(token = %invite.redacted(), error = %err, "Failed to consume invite token");
                self.discard_user(user).await;
                Err(err.into())
            }
        }
    }

    async fn discard_group(&self, group: &Group) {
        match self.groups.delete(group.id).await {
            Ok(_) => info!(group_id = %group.id, "Rolled back founded group"),
            Err(err) => error!(group_id = %group.id, error = %err, "Failed to roll back group"),
        }
    }

    async fn discard_user(&self, user: &User) {
        match self.users.delete(user.id).await {
            Ok(_) => info!(user_id = %user.id, "Rolled back registered user"),
            Err(err) => error!(user_id = %user.id, error = %err, "Failed to roll back user"),
        }
    }

    async fn notify(&self, user: &User, founded_group: bool) {
        let event = UserCreatedEvent::for_user(user, founded_group);
        match self.notifier.user_created(&event).await {
            NotifyResult::Sent => {}
            NotifyResult::Skipped => debug!(user_id = %user.id, "User event skipped"),
            NotifyResult::Failed(reason) => {
                warn!(user_id = %user.id, reason = %reason, "User event delivery failed")
            }
        }
    }
}
