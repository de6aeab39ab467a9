//! Invite token repository for database operations.

use domain::models::{InviteToken, NewInviteToken, TokenConsumption};
use domain::services::{InviteTokenStore, StoreError};
use sqlx::PgPool;
use tracing::debug;

use super::map_store_error;
use crate::entities::InviteTokenEntity;
use crate::metrics::{record_token_consumption, QueryTimer};

/// Repository for group invite tokens.
#[derive(Clone)]
pub struct InviteTokenRepository {
    pool: PgPool,
}

impl InviteTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a token without consuming it.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<InviteTokenEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_token");
        let result = sqlx::query_as::<_, InviteTokenEntity>(
            r#"
            SELECT token, group_id, uses_left
            FROM group_invite_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a token.
    pub async fn create_token(&self, token: &NewInviteToken) -> Result<InviteTokenEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invite_token");
        let result = sqlx::query_as::<_, InviteTokenEntity>(
            r#"
            INSERT INTO group_invite_tokens (token, group_id, uses_left)
            VALUES ($1, $2, $3)
            RETURNING token, group_id, uses_left
            "#,
        )
        .bind(&token.token)
        .bind(token.group_id)
        .bind(token.uses_left)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Take one use of a token.
    ///
    /// The row is locked for the duration of the transaction, so concurrent
    /// callers serialize here. The last use deletes the row instead of
    /// writing a zero count.
    pub async fn consume_token(&self, token: &str) -> Result<TokenConsumption, sqlx::Error> {
        let timer = QueryTimer::new("consume_invite_token");
        let outcome = timer.finish(self.consume_in_tx(token).await)?;
        record_token_consumption(outcome);
        debug!(result = outcome.as_str(), "Invite token consumption committed");
        Ok(outcome)
    }

    async fn consume_in_tx(&self, token: &str) -> Result<TokenConsumption, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let uses_left: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT uses_left
            FROM group_invite_tokens
            WHERE token = $1
            FOR UPDATE
            "#,
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = uses_left
            .map(TokenConsumption::after_use)
            .unwrap_or(TokenConsumption::Exhausted);

        match outcome {
            TokenConsumption::Decremented { uses_left } => {
                sqlx::query("UPDATE group_invite_tokens SET uses_left = $2 WHERE token = $1")
                    .bind(token)
                    .bind(uses_left)
                    .execute(&mut *tx)
                    .await?;
            }
            TokenConsumption::Retired => {
                sqlx::query("DELETE FROM group_invite_tokens WHERE token = $1")
                    .bind(token)
                    .execute(&mut *tx)
                    .await?;
            }
            TokenConsumption::Exhausted => {}
        }

        tx.commit().await?;
        Ok(outcome)
    }

    /// Delete a token outright.
    pub async fn delete_token(&self, token: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_invite_token");
        let result = sqlx::query("DELETE FROM group_invite_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl InviteTokenStore for InviteTokenRepository {
    async fn get(&self, token: &str) -> Result<Option<InviteToken>, StoreError> {
        let entity = self.find_by_token(token).await.map_err(map_store_error)?;
        Ok(entity.map(InviteToken::from))
    }

    async fn create(&self, token: NewInviteToken) -> Result<InviteToken, StoreError> {
        let entity = self.create_token(&token).await.map_err(map_store_error)?;
        Ok(entity.into())
    }

    async fn consume(&self, token: &str) -> Result<TokenConsumption, StoreError> {
        self.consume_token(token).await.map_err(map_store_error)
    }

    async fn delete(&self, token: &str) -> Result<bool, StoreError> {
        self.delete_token(token).await.map_err(map_store_error)
    }
}
