//! Field validators for registration input.
//!
//! Each function follows the `validator` crate's custom-function signature so
//! it can be referenced from `#[validate(custom(function = ...))]`.

use validator::ValidationError;

/// Minimum username length in characters.
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length in characters.
pub const MAX_USERNAME_LENGTH: usize = 64;

/// Maximum group name length in characters.
pub const MAX_GROUP_NAME_LENGTH: usize = 100;

lazy_static::lazy_static! {
    static ref USERNAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").unwrap();
}

/// Validates a username: 3-64 characters, starting with a letter or digit,
/// then letters, digits, `_`, `.` or `-`.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        let mut err = ValidationError::new("username_length");
        err.message = Some("Username must be between 3 and 64 characters".into());
        return Err(err);
    }

    if !USERNAME_REGEX.is_match(username) {
        let mut err = ValidationError::new("username_format");
        err.message = Some(
            "Username may only contain letters, digits, '_', '.' and '-' and must start with a letter or digit"
                .into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates a group name: not blank and at most 100 characters.
pub fn validate_group_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("group_name_blank");
        err.message = Some("Group name must not be blank".into());
        return Err(err);
    }

    if name.chars().count() > MAX_GROUP_NAME_LENGTH {
        let mut err = ValidationError::new("group_name_length");
        err.message = Some("Group name must be at most 100 characters".into());
        return Err(err);
    }

    Ok(())
}

/// Returns the trimmed value if it contains anything but whitespace.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob.smith-2").is_ok());
        assert!(validate_username("x_y").is_ok());
    }

    #[test]
    fn test_validate_username_too_short() {
        let err = validate_username("ab").unwrap_err();
        assert_eq!(err.code, "username_length");
    }

    #[test]
    fn test_validate_username_too_long() {
        let err = validate_username(&"a".repeat(65)).unwrap_err();
        assert_eq!(err.code, "username_length");
    }

    #[test]
    fn test_validate_username_bad_characters() {
        assert_eq!(validate_username("al ice").unwrap_err().code, "username_format");
        assert_eq!(validate_username("_alice").unwrap_err().code, "username_format");
        assert_eq!(validate_username("alice@home").unwrap_err().code, "username_format");
    }

    #[test]
    fn test_validate_group_name() {
        assert!(validate_group_name("Home Kitchen").is_ok());
        assert_eq!(validate_group_name("   ").unwrap_err().code, "group_name_blank");
        assert_eq!(
            validate_group_name(&"g".repeat(101)).unwrap_err().code,
            "group_name_length"
        );
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  family ")), Some("family"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(None), None);
    }
}
