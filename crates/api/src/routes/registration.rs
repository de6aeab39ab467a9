//! User registration endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use domain::models::{RegistrationRequest, User};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::record_registration;

/// Register a user, founding a group or joining one through an invite token.
///
/// POST /api/v1/users/register
///
/// Returns 201 with the created user. The password hash is never included.
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(request) = payload?;

    let result = state.registration.register_request(request).await;
    record_registration(&result);
    let user = result?;

    info!(
        user_id = %user.id,
        group_id = %user.group_id,
        founder = user.permissions.is_founder(),
        "Registration completed"
    );

    Ok((StatusCode::CREATED, Json(user)))
}
