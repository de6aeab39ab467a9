use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{
    Argon2PasswordHasher, GroupStore, InviteTokenStore, RegistrationService,
    TracingUserEventNotifier, UserStore,
};
use persistence::repositories::{GroupRepository, InviteTokenRepository, UserRepository};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, request_id};
use crate::routes::{health, registration};

#[derive(Clone)]
pub struct AppState {
    pub registration: Arc<RegistrationService>,
    /// Present when the stores are backed by PostgreSQL.
    pub pool: Option<PgPool>,
    pub config: Arc<Config>,
}

/// Wires a [`RegistrationService`] over the given stores using the
/// configured hashing cost and group creation policy.
pub fn registration_service(
    config: &Config,
    groups: Arc<dyn GroupStore>,
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn InviteTokenStore>,
) -> RegistrationService {
    RegistrationService::new(
        groups,
        users,
        tokens,
        Arc::new(Argon2PasswordHasher::new(config.password)),
        Arc::new(TracingUserEventNotifier),
    )
    .with_group_creation(config.registration.allow_group_creation)
}

/// Builds the application over PostgreSQL-backed stores.
pub fn create_app(config: Config, pool: PgPool) -> Router {
    let service = registration_service(
        &config,
        Arc::new(GroupRepository::new(pool.clone())),
        Arc::new(UserRepository::new(pool.clone())),
        Arc::new(InviteTokenRepository::new(pool.clone())),
    );

    router(AppState {
        registration: Arc::new(service),
        pool: Some(pool),
        config: Arc::new(config),
    })
}

/// Builds the router for an already assembled state.
pub fn router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    let api_routes = Router::new().route(
        "/api/v1/users/register",
        post(registration::register_user),
    );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id))
        .with_state(state)
}
