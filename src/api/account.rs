//! Account management endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::ChangePassword,
};

use super::{auth::MessageResponse, SessionUser};

/// Change the authenticated user's password
#[utoipa::path(
    put,
    path = "/account/password",
    tag = "account",
    request_body = ChangePassword,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "New password too short"),
        (status = 401, description = "Not authenticated or current password incorrect")
    )
)]
pub async fn change_password(
    State(state): State<crate::AppState>,
    SessionUser(principal): SessionUser,
    Json(request): Json<ChangePassword>,
) -> AppResult<Json<MessageResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state
        .services
        .accounts
        .change_password(
            principal.user_id,
            &request.current_password,
            &request.new_password,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}
