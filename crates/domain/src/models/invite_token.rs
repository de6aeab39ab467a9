//! Group invite token domain models.
//!
//! An invite token lets a limited number of users register into an existing
//! group. Each successful registration consumes one use; a token with no
//! uses left is deleted rather than kept at zero.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Number of leading characters of a token that may appear in logs.
const LOG_PREFIX_LEN: usize = 6;

/// A stored invite token. `uses_left` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteToken {
    pub token: String,
    pub group_id: Uuid,
    pub uses_left: i32,
}

impl InviteToken {
    /// Loggable form of the token.
    pub fn redacted(&self) -> String {
        redact_token(&self.token)
    }
}

/// Input for creating an invite token.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct NewInviteToken {
    #[validate(length(min = 1, max = 255, message = "token must be 1-255 characters"))]
    pub token: String,

    pub group_id: Uuid,

    #[validate(range(min = 1, message = "uses_left must be at least 1"))]
    pub uses_left: i32,
}

/// Outcome of atomically consuming one use of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenConsumption {
    /// One use was taken and the token remains with this many uses.
    Decremented { uses_left: i32 },
    /// The last use was taken and the token was deleted.
    Retired,
    /// No use was available; the token no longer exists.
    Exhausted,
}

impl TokenConsumption {
    /// Whether a use was actually taken.
    pub fn consumed(&self) -> bool {
        !matches!(self, TokenConsumption::Exhausted)
    }

    /// Metric label for this outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenConsumption::Decremented { .. } => "decremented",
            TokenConsumption::Retired => "retired",
            TokenConsumption::Exhausted => "exhausted",
        }
    }

    /// The consumption result for a token that currently has `uses_left` uses.
    pub fn after_use(uses_left: i32) -> Self {
        match uses_left {
            n if n <= 0 => TokenConsumption::Exhausted,
            1 => TokenConsumption::Retired,
            n => TokenConsumption::Decremented { uses_left: n - 1 },
        }
    }
}

/// Shortens a token to a prefix safe to write to logs.
pub fn redact_token(token: &str) -> String {
    let prefix: String = token.chars().take(LOG_PREFIX_LEN).collect();
    format!("{}…", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_after_use_decrements() {
        assert_eq!(
            TokenConsumption::after_use(3),
            TokenConsumption::Decremented { uses_left: 2 }
        );
        assert_eq!(
            TokenConsumption::after_use(2),
            TokenConsumption::Decremented { uses_left: 1 }
        );
    }

    #[test]
    fn test_after_use_retires_last_use() {
        assert_eq!(TokenConsumption::after_use(1), TokenConsumption::Retired);
    }

    #[test]
    fn test_after_use_never_goes_negative() {
        assert_eq!(TokenConsumption::after_use(0), TokenConsumption::Exhausted);
        assert_eq!(TokenConsumption::after_use(-4), TokenConsumption::Exhausted);
    }

    #[test]
    fn test_consumed() {
        assert!(TokenConsumption::Retired.consumed());
        assert!(TokenConsumption::Decremented { uses_left: 1 }.consumed());
        assert!(!TokenConsumption::Exhausted.consumed());
    }

    #[test]
    fn test_redact_token() {
        assert_eq!(redact_token("abcdefghijkl"), "abcdef…");
        assert_eq!(redact_token("abc"), "abc…");
    }

    #[test]
    fn test_new_invite_token_validation() {
        let valid = NewInviteToken {
            token: "tok".to_string(),
            group_id: Uuid::new_v4(),
            uses_left: 1,
        };
        assert!(valid.validate().is_ok());

        let zero_uses = NewInviteToken {
            uses_left: 0,
            ..valid.clone()
        };
        assert!(zero_uses.validate().is_err());

        let empty = NewInviteToken {
            token: String::new(),
            ..valid
        };
        assert!(empty.validate().is_err());
    }
}
