//! Group domain models.
//!
//! A group is the tenant every user belongs to. Groups are created once, by
//! the user who founds them, together with their preference bundle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Day index used as the first day of the week for new groups (Sunday).
pub const DEFAULT_FIRST_DAY_OF_WEEK: i32 = 0;

/// Group-wide preferences, fixed at founding time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupPreferences {
    pub private_group: bool,
    pub first_day_of_week: i32,
    pub recipe_public: bool,
    pub recipe_show_nutrition: bool,
    pub recipe_show_assets: bool,
    pub recipe_landscape_view: bool,
    pub recipe_disable_comments: bool,
    pub recipe_disable_amount: bool,
}

impl GroupPreferences {
    /// Derives the preference bundle for a freshly founded group.
    ///
    /// Private groups hide their recipes; advanced founders get the full
    /// recipe feature set switched on.
    pub fn for_new_group(private: bool, advanced: bool) -> Self {
        Self {
            private_group: private,
            first_day_of_week: DEFAULT_FIRST_DAY_OF_WEEK,
            recipe_public: !private,
            recipe_show_nutrition: advanced,
            recipe_show_assets: advanced,
            recipe_landscape_view: false,
            recipe_disable_comments: advanced,
            recipe_disable_amount: advanced,
        }
    }
}

/// A persisted group with its preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub preferences: GroupPreferences,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a group and its preferences in one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
    pub preferences: GroupPreferences,
}

impl NewGroup {
    /// Builds the founding input for a group.
    pub fn founded(name: impl Into<String>, private: bool, advanced: bool) -> Self {
        Self {
            name: name.into(),
            preferences: GroupPreferences::for_new_group(private, advanced),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_basic_preferences() {
        let prefs = GroupPreferences::for_new_group(true, false);
        assert!(prefs.private_group);
        assert!(!prefs.recipe_public);
        assert!(!prefs.recipe_show_nutrition);
        assert!(!prefs.recipe_show_assets);
        assert!(!prefs.recipe_disable_comments);
        assert!(!prefs.recipe_disable_amount);
        assert!(!prefs.recipe_landscape_view);
        assert_eq!(prefs.first_day_of_week, 0);
    }

    #[test]
    fn test_public_advanced_preferences() {
        let prefs = GroupPreferences::for_new_group(false, true);
        assert!(!prefs.private_group);
        assert!(prefs.recipe_public);
        assert!(prefs.recipe_show_nutrition);
        assert!(prefs.recipe_show_assets);
        assert!(prefs.recipe_disable_comments);
        assert!(prefs.recipe_disable_amount);
        assert!(!prefs.recipe_landscape_view);
    }

    #[test]
    fn test_landscape_and_week_start_are_fixed() {
        for private in [true, false] {
            for advanced in [true, false] {
                let prefs = GroupPreferences::for_new_group(private, advanced);
                assert!(!prefs.recipe_landscape_view);
                assert_eq!(prefs.first_day_of_week, DEFAULT_FIRST_DAY_OF_WEEK);
                assert_eq!(prefs.recipe_public, !prefs.private_group);
            }
        }
    }

    #[test]
    fn test_new_group_founded() {
        let group = NewGroup::founded("Kitchen", false, false);
        assert_eq!(group.name, "Kitchen");
        assert_eq!(group.preferences, GroupPreferences::for_new_group(false, false));
    }

    #[test]
    fn test_preferences_serialization() {
        let prefs = GroupPreferences::for_new_group(true, true);
        let json = serde_json::to_value(prefs).unwrap();
        assert_eq!(json["private_group"], true);
        assert_eq!(json["recipe_public"], false);
        assert_eq!(json["first_day_of_week"], 0);
    }
}
