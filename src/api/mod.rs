//! API handlers for Biblos REST endpoints

pub mod account;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod lending;
pub mod openapi;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use crate::{error::AppError, models::user::Principal, AppState};

/// Extractor resolving the session cookie to an authenticated principal
pub struct SessionUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(&state.config.sessions.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| AppError::Authentication("Missing session cookie".to_string()))?;

        let principal = state
            .services
            .sessions
            .fetch(&token)
            .await?
            .ok_or_else(|| AppError::Authentication("Session expired or invalid".to_string()))?;

        Ok(SessionUser(principal))
    }
}
