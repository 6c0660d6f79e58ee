//! Authentication endpoints: signup, login, logout, current user

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{Credentials, Principal, User},
};

use super::SessionUser;

/// Response for successful signup/login
#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub user: User,
    pub message: String,
}

/// Plain confirmation message
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn session_cookie(name: &str, token: String) -> Cookie<'static> {
    Cookie::build((name.to_string(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn removal_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(name.to_string()).path("/").build()
}

/// Create an account and open a session
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = Credentials,
    responses(
        (status = 201, description = "Account created, session cookie set", body = SessionResponse),
        (status = 400, description = "Invalid username or password"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> AppResult<(StatusCode, CookieJar, Json<SessionResponse>)> {
    credentials
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.services.accounts.register(&credentials).await?;

    let principal = Principal {
        user_id: user.id,
        username: user.username.clone(),
    };
    let token = state.services.sessions.create(&principal).await?;
    let jar = jar.add(session_cookie(&state.config.sessions.cookie_name, token));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(SessionResponse {
            user,
            message: "Account created".to_string(),
        }),
    ))
}

/// Authenticate and open a session
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = SessionResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> AppResult<(CookieJar, Json<SessionResponse>)> {
    let user = state.services.accounts.authenticate(&credentials).await?;

    let principal = Principal {
        user_id: user.id,
        username: user.username.clone(),
    };
    let token = state.services.sessions.create(&principal).await?;
    let jar = jar.add(session_cookie(&state.config.sessions.cookie_name, token));

    Ok((
        jar,
        Json(SessionResponse {
            user,
            message: "Logged in".to_string(),
        }),
    ))
}

/// Destroy the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session destroyed, cookie cleared", body = MessageResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    SessionUser(_principal): SessionUser,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    if let Some(cookie) = jar.get(&state.config.sessions.cookie_name) {
        state.services.sessions.destroy(cookie.value()).await?;
    }

    let jar = jar.remove(removal_cookie(&state.config.sessions.cookie_name));

    Ok((
        jar,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    ))
}

/// Get the authenticated user, freshly read from the store
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    SessionUser(principal): SessionUser,
) -> AppResult<Json<User>> {
    let user = state.services.accounts.get_by_id(principal.user_id).await?;
    Ok(Json(user))
}
