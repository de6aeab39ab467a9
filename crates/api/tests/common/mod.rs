//! Shared fixtures for API integration tests.
//!
//! The router is built over in-memory stores, so these tests need no
//! database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use domain::models::{Group, NewGroup, NewInviteToken};
use domain::services::{
    GroupStore, InMemoryGroupStore, InMemoryInviteTokenStore, InMemoryUserStore, InviteTokenStore,
};
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use registration_api::app::{registration_service, router, AppState};
use registration_api::config::Config;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "Correct-Horse-42";

pub struct TestApp {
    pub router: Router,
    pub groups: Arc<InMemoryGroupStore>,
    pub users: Arc<InMemoryUserStore>,
    pub tokens: Arc<InMemoryInviteTokenStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_overrides(&[])
    }

    pub fn with_overrides(overrides: &[(&str, &str)]) -> Self {
        let config = Config::load_for_test(overrides).expect("Failed to load config");
        let groups = Arc::new(InMemoryGroupStore::new());
        let users = Arc::new(InMemoryUserStore::new());
        let tokens = Arc::new(InMemoryInviteTokenStore::new());

        let service = registration_service(&config, groups.clone(), users.clone(), tokens.clone());
        let router = router(AppState {
            registration: Arc::new(service),
            pool: None,
            config: Arc::new(config),
        });

        Self {
            router,
            groups,
            users,
            tokens,
        }
    }

    /// Creates a group and an invite token for it.
    pub async fn seed_token(&self, uses_left: i32) -> (Group, String) {
        let group = self
            .groups
            .create(NewGroup::founded(format!("group-{}", Uuid::new_v4()), false, false))
            .await
            .expect("Failed to create group");
        let token = format!("invite-{}", Uuid::new_v4().simple());
        self.tokens
            .create(NewInviteToken {
                token: token.clone(),
                group_id: group.id,
                uses_left,
            })
            .await
            .expect("Failed to create token");
        (group, token)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(json_request(Method::POST, uri, body))
            .await
            .expect("Request failed");
        let status = response.status();
        (status, parse_response_body(response).await)
    }

    pub async fn register(&self, body: Value) -> (StatusCode, Value) {
        self.post_json("/api/v1/users/register", body).await
    }
}

/// A registrant with a unique username and a generated email.
pub struct TestUser {
    pub username: String,
    pub email: String,
}

impl TestUser {
    pub fn new() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        let email: String = SafeEmail().fake();
        Self {
            username: format!("user{}", &suffix[..12]),
            email: format!("{}.{}", &suffix[..8], email),
        }
    }

    pub fn founding(&self, group: &str) -> Value {
        json!({
            "username": self.username,
            "email": self.email,
            "password": PASSWORD,
            "group": group,
        })
    }

    pub fn joining(&self, token: &str) -> Value {
        json!({
            "username": self.username,
            "email": self.email,
            "password": PASSWORD,
            "group_token": token,
        })
    }
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

pub async fn parse_response_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}
