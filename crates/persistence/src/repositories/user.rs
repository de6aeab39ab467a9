//! User repository for database operations.

use domain::models::{NewUser, User};
use domain::services::{StoreError, UserStore};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_store_error;
use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

const SELECT_USER: &str = r#"
    SELECT u.id, u.email, u.username, u.full_name, u.password_hash, u.group_id,
           g.name AS group_name, u.advanced, u.can_invite, u.can_manage,
           u.can_organize, u.created_at
    FROM users u
    JOIN groups g ON g.id = u.group_id
"#;

/// Repository for user records.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user and return it with its group name.
    pub async fn create_user(&self, user: &NewUser) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            WITH inserted AS (
                INSERT INTO users (
                    email, username, full_name, password_hash, group_id,
                    advanced, can_invite, can_manage, can_organize
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING id, email, username, full_name, password_hash, group_id,
                          advanced, can_invite, can_manage, can_organize, created_at
            )
            SELECT i.id, i.email, i.username, i.full_name, i.password_hash, i.group_id,
                   g.name AS group_name, i.advanced, i.can_invite, i.can_manage,
                   i.can_organize, i.created_at
            FROM inserted i
            JOIN groups g ON g.id = i.group_id
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(user.group_id)
        .bind(user.advanced)
        .bind(user.permissions.can_invite)
        .bind(user.permissions.can_manage)
        .bind(user.permissions.can_organize)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let query = format!("{SELECT_USER} WHERE u.id = $1");
        let result = sqlx::query_as::<_, UserEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_username");
        let query = format!("{SELECT_USER} WHERE u.username = $1");
        let result = sqlx::query_as::<_, UserEntity>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_user");
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl UserStore for UserRepository {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let entity = self.find_by_id(id).await.map_err(map_store_error)?;
        Ok(entity.map(User::from))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let entity = self
            .find_by_username(username)
            .await
            .map_err(map_store_error)?;
        Ok(entity.map(User::from))
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let entity = self.create_user(&user).await.map_err(map_store_error)?;
        Ok(entity.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.delete_user(id).await.map_err(map_store_error)
    }
}
