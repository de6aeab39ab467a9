//! Group entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Group, GroupPreferences};
use sqlx::FromRow;
use uuid::Uuid;

/// A `groups` row joined with its `group_preferences` row.
#[derive(Debug, Clone, FromRow)]
pub struct GroupEntity {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub private_group: bool,
    pub first_day_of_week: i32,
    pub recipe_public: bool,
    pub recipe_show_nutrition: bool,
    pub recipe_show_assets: bool,
    pub recipe_landscape_view: bool,
    pub recipe_disable_comments: bool,
    pub recipe_disable_amount: bool,
}

impl From<GroupEntity> for Group {
    fn from(entity: GroupEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            preferences: GroupPreferences {
                private_group: entity.private_group,
                first_day_of_week: entity.first_day_of_week,
                recipe_public: entity.recipe_public,
                recipe_show_nutrition: entity.recipe_show_nutrition,
                recipe_show_assets: entity.recipe_show_assets,
                recipe_landscape_view: entity.recipe_landscape_view,
                recipe_disable_comments: entity.recipe_disable_comments,
                recipe_disable_amount: entity.recipe_disable_amount,
            },
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the groups table alone.
#[derive(Debug, Clone, FromRow)]
pub struct GroupRowEntity {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl GroupRowEntity {
    /// Attaches the preferences written alongside this row.
    pub fn with_preferences(self, preferences: GroupPreferences) -> Group {
        Group {
            id: self.id,
            name: self.name,
            preferences,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_entity_conversion() {
        let entity = GroupEntity {
            id: Uuid::new_v4(),
            name: "Family".to_string(),
            created_at: Utc::now(),
            private_group: true,
            first_day_of_week: 0,
            recipe_public: false,
            recipe_show_nutrition: true,
            recipe_show_assets: true,
            recipe_landscape_view: false,
            recipe_disable_comments: true,
            recipe_disable_amount: true,
        };
        let id = entity.id;

        let group: Group = entity.into();
        assert_eq!(group.id, id);
        assert_eq!(group.preferences, GroupPreferences::for_new_group(true, true));
    }

    #[test]
    fn test_row_with_preferences() {
        let row = GroupRowEntity {
            id: Uuid::new_v4(),
            name: "Family".to_string(),
            created_at: Utc::now(),
        };
        let prefs = GroupPreferences::for_new_group(false, false);
        let group = row.clone().with_preferences(prefs);
        assert_eq!(group.name, "Family");
        assert_eq!(group.preferences, prefs);
    }
}
