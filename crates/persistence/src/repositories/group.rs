//! Group repository for database operations.

use domain::models::{Group, NewGroup};
use domain::services::{GroupStore, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_store_error;
use crate::entities::{GroupEntity, GroupRowEntity};
use crate::metrics::QueryTimer;

const SELECT_GROUP: &str = r#"
    SELECT g.id, g.name, g.created_at,
           p.private_group, p.first_day_of_week, p.recipe_public,
           p.recipe_show_nutrition, p.recipe_show_assets, p.recipe_landscape_view,
           p.recipe_disable_comments, p.recipe_disable_amount
    FROM groups g
    JOIN group_preferences p ON p.group_id = g.id
"#;

/// Repository for groups and their preferences.
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a group and its preferences in one transaction.
    pub async fn create_group(&self, group: &NewGroup) -> Result<Group, sqlx::Error> {
        let timer = QueryTimer::new("create_group");
        timer.finish(self.insert_group(group).await)
    }

    async fn insert_group(&self, group: &NewGroup) -> Result<Group, sqlx::Error> {
        let prefs = group.preferences;

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, GroupRowEntity>(
            r#"
            INSERT INTO groups (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(&group.name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO group_preferences (
                group_id, private_group, first_day_of_week, recipe_public,
                recipe_show_nutrition, recipe_show_assets, recipe_landscape_view,
                recipe_disable_comments, recipe_disable_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(row.id)
        .bind(prefs.private_group)
        .bind(prefs.first_day_of_week)
        .bind(prefs.recipe_public)
        .bind(prefs.recipe_show_nutrition)
        .bind(prefs.recipe_show_assets)
        .bind(prefs.recipe_landscape_view)
        .bind(prefs.recipe_disable_comments)
        .bind(prefs.recipe_disable_amount)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.with_preferences(prefs))
    }

    /// Find a group by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_id");
        let query = format!("{SELECT_GROUP} WHERE g.id = $1");
        let result = sqlx::query_as::<_, GroupEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find a group by its unique name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_name");
        let query = format!("{SELECT_GROUP} WHERE g.name = $1");
        let result = sqlx::query_as::<_, GroupEntity>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Delete a group. Preferences and invite tokens go with it.
    pub async fn delete_group(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_group");
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl GroupStore for GroupRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Group>, StoreError> {
        let entity = self.find_by_id(id).await.map_err(map_store_error)?;
        Ok(entity.map(Group::from))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Group>, StoreError> {
        let entity = self.find_by_name(name).await.map_err(map_store_error)?;
        Ok(entity.map(Group::from))
    }

    async fn create(&self, group: NewGroup) -> Result<Group, StoreError> {
        self.create_group(&group).await.map_err(map_store_error)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.delete_group(id).await.map_err(map_store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_group_joins_preferences() {
        assert!(SELECT_GROUP.contains("JOIN group_preferences p ON p.group_id = g.id"));
        assert!(SELECT_GROUP.contains("p.recipe_disable_amount"));
    }
}
