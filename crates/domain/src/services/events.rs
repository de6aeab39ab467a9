//! User lifecycle notifications.
//!
//! Notifications are fire-and-forget: a failed delivery is logged and never
//! fails the operation that triggered it.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

/// Event emitted after a user has been registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserCreatedEvent {
    pub user_id: Uuid,
    pub username: String,
    pub group_id: Uuid,
    pub group_name: String,
    pub founded_group: bool,
    pub timestamp: DateTime<Utc>,
}

impl UserCreatedEvent {
    pub fn for_user(user: &User, founded_group: bool) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            group_id: user.group_id,
            group_name: user.group_name.clone(),
            founded_group,
            timestamp: Utc::now(),
        }
    }
}

/// Result of a notification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyResult {
    Sent,
    Failed(String),
    Skipped,
}

/// Sink for user lifecycle events.
#[async_trait::async_trait]
pub trait UserEventNotifier: Send + Sync {
    async fn user_created(&self, event: &UserCreatedEvent) -> NotifyResult;
}

/// Notifier that writes events to the tracing pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingUserEventNotifier;

#[async_trait::async_trait]
impl UserEventNotifier for TracingUserEventNotifier {
    async fn user_created(&self, event: &UserCreatedEvent) -> NotifyResult {
        tracing::info!(
            user_id = %event.user_id,
            username = %event.username,
            group_id = %event.group_id,
            group_name = %event.group_name,
            founded_group = event.founded_group,
            "User created"
        );
        NotifyResult::Sent
    }
}

/// Recording notifier for tests.
#[derive(Debug, Default)]
pub struct MockUserEventNotifier {
    /// Whether to simulate delivery failures.
    pub simulate_failure: bool,
    events: Mutex<Vec<UserCreatedEvent>>,
}

impl MockUserEventNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every delivery fails.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Events delivered so far.
    pub fn events(&self) -> Vec<UserCreatedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl UserEventNotifier for MockUserEventNotifier {
    async fn user_created(&self, event: &UserCreatedEvent) -> NotifyResult {
        if self.simulate_failure {
            tracing::warn!(user_id = %event.user_id, "Mock notifier simulating failure");
            return NotifyResult::Failed("Simulated failure".to_string());
        }

        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
        NotifyResult::Sent
    }
}
