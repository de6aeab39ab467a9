//! Registration request models.
//!
//! `RegistrationRequest` is the wire form: two optional target fields that
//! callers may fill in any combination. `Registration` is the validated form,
//! in which the target is a sum type and the illegal combinations (neither or
//! both) cannot exist.

use std::fmt;

use serde::Deserialize;
use shared::validation::{non_blank, validate_group_name, validate_username};
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Why a registration request was rejected before touching any store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRegistration {
    #[error("Either a group name or a group token is required")]
    MissingTarget,

    #[error("Provide a group name or a group token, not both")]
    AmbiguousTarget,

    #[error("{0}")]
    Field(String),
}

/// Registration request as received from a caller.
#[derive(Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Defaults to the username when absent or blank.
    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,

    #[serde(default)]
    pub advanced: bool,

    #[serde(default)]
    pub private: bool,

    /// Name of a group to found.
    #[serde(default)]
    pub group: Option<String>,

    /// Invite token for joining an existing group.
    #[serde(default, alias = "groupToken")]
    pub group_token: Option<String>,
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("full_name", &self.full_name)
            .field("advanced", &self.advanced)
            .field("private", &self.private)
            .field("group", &self.group)
            .field("group_token", &self.group_token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Where a registration places the new user.
#[derive(Clone, PartialEq, Eq)]
pub enum RegistrationTarget {
    /// Found a new group with this name.
    FoundGroup { name: String, private: bool },
    /// Join the group an invite token points to.
    JoinGroup { token: String },
}

impl RegistrationTarget {
    /// Founding target. The name is trimmed and must pass the group name rules.
    pub fn found(name: &str, private: bool) -> Result<Self, InvalidRegistration> {
        let name = non_blank(Some(name)).ok_or(InvalidRegistration::MissingTarget)?;
        validate_group_name(name).map_err(group_name_error)?;
        Ok(RegistrationTarget::FoundGroup {
            name: name.to_string(),
            private,
        })
    }

    /// Joining target. The token is trimmed and must not be blank.
    pub fn join(token: &str) -> Result<Self, InvalidRegistration> {
        let token = non_blank(Some(token)).ok_or(InvalidRegistration::MissingTarget)?;
        Ok(RegistrationTarget::JoinGroup {
            token: token.to_string(),
        })
    }

    /// Re-checks a target that may have been assembled field by field.
    pub fn check(&self) -> Result<(), InvalidRegistration> {
        match self {
            RegistrationTarget::FoundGroup { name, .. } => {
                if non_blank(Some(name)).is_none() {
                    return Err(InvalidRegistration::MissingTarget);
                }
                validate_group_name(name).map_err(group_name_error)
            }
            RegistrationTarget::JoinGroup { token } => match non_blank(Some(token)) {
                Some(_) => Ok(()),
                None => Err(InvalidRegistration::MissingTarget),
            },
        }
    }

    pub fn is_new_group(&self) -> bool {
        matches!(self, RegistrationTarget::FoundGroup { .. })
    }
}

fn group_name_error(err: ValidationError) -> InvalidRegistration {
    InvalidRegistration::Field(format!("group: {}", err.message.unwrap_or_default()))
}

impl fmt::Debug for RegistrationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationTarget::FoundGroup { name, private } => f
                .debug_struct("FoundGroup")
                .field("name", name)
                .field("private", private)
                .finish(),
            RegistrationTarget::JoinGroup { token } => f
                .debug_struct("JoinGroup")
                .field("token", &super::invite_token::redact_token(token))
                .finish(),
        }
    }
}

/// A validated registration.
#[derive(Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub advanced: bool,
    pub target: RegistrationTarget,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("full_name", &self.full_name)
            .field("advanced", &self.advanced)
            .field("target", &self.target)
            .finish()
    }
}

impl Registration {
    /// Registration that founds a new group.
    pub fn found_group(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        group_name: &str,
    ) -> Result<Self, InvalidRegistration> {
        let target = RegistrationTarget::found(group_name, false)?;
        Ok(Self::with_target(username.into(), email.into(), password.into(), target))
    }

    /// Registration that joins a group through an invite token.
    pub fn join_group(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        token: &str,
    ) -> Result<Self, InvalidRegistration> {
        let target = RegistrationTarget::join(token)?;
        Ok(Self::with_target(username.into(), email.into(), password.into(), target))
    }

    fn with_target(
        username: String,
        email: String,
        password: String,
        target: RegistrationTarget,
    ) -> Self {
        Self {
            full_name: username.clone(),
            username,
            email: normalize_email(&email),
            password,
            advanced: false,
            target,
        }
    }

    pub fn with_advanced(mut self, advanced: bool) -> Self {
        self.advanced = advanced;
        self
    }

    /// Marks a founding registration as private. No effect when joining.
    pub fn with_private(mut self, private: bool) -> Self {
        if let RegistrationTarget::FoundGroup { private: p, .. } = &mut self.target {
            *p = private;
        }
        self
    }
}

impl TryFrom<RegistrationRequest> for Registration {
    type Error = InvalidRegistration;

    fn try_from(request: RegistrationRequest) -> Result<Self, Self::Error> {
        request.validate().map_err(|e| {
            let messages: Vec<String> = e
                .field_errors()
                .iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |err| match &err.message {
                        Some(msg) => format!("{}: {}", field, msg),
                        None => format!("{}: invalid", field),
                    })
                })
                .collect();
            InvalidRegistration::Field(messages.join(", "))
        })?;

        let group = non_blank(request.group.as_deref());
        let token = non_blank(request.group_token.as_deref());

        let target = match (group, token) {
            (Some(name), None) => RegistrationTarget::found(name, request.private)?,
            (None, Some(token)) => RegistrationTarget::join(token)?,
            (Some(_), Some(_)) => return Err(InvalidRegistration::AmbiguousTarget),
            (None, None) => return Err(InvalidRegistration::MissingTarget),
        };

        let full_name = non_blank(request.full_name.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| request.username.clone());

        Ok(Self {
            email: normalize_email(&request.email),
            username: request.username,
            password: request.password,
            full_name,
            advanced: request.advanced,
            target,
        })
    }
}

/// Emails are compared and stored lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
