//! PostgreSQL implementations of the domain store traits.

pub mod group;
pub mod invite_token;
pub mod user;

pub use group::GroupRepository;
pub use invite_token::InviteTokenRepository;
pub use user::UserRepository;

use domain::services::{StoreError, UniqueField};

/// SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Maps a unique constraint name from the migrations to the field it guards.
fn unique_field_for(constraint: &str) -> Option<UniqueField> {
    match constraint {
        "groups_name_key" => Some(UniqueField::GroupName),
        "users_username_key" => Some(UniqueField::Username),
        "users_email_key" => Some(UniqueField::Email),
        "group_invite_tokens_pkey" => Some(UniqueField::Token),
        _ => None,
    }
}

/// Translates a sqlx error into a [`StoreError`].
pub(crate) fn map_store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            if let Some(field) = db_err.constraint().and_then(unique_field_for) {
                return StoreError::UniqueViolation { field };
            }
        }
    }
    StoreError::Backend(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_field_for_known_constraints() {
        assert_eq!(unique_field_for("groups_name_key"), Some(UniqueField::GroupName));
        assert_eq!(unique_field_for("users_username_key"), Some(UniqueField::Username));
        assert_eq!(unique_field_for("users_email_key"), Some(UniqueField::Email));
        assert_eq!(
            unique_field_for("group_invite_tokens_pkey"),
            Some(UniqueField::Token)
        );
        assert_eq!(unique_field_for("group_preferences_group_id_key"), None);
    }

    #[test]
    fn test_non_database_errors_are_backend_errors() {
        let err = map_store_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Backend(_)));
        let err = map_store_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
