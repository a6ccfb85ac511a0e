// Session helpers shared by the server functions in this module.

use dioxus::prelude::*;
use shared_types::{AppError, AuthUser};
use sqlx::{Pool, Postgres};

use crate::auth::{cookies, jwt};
use crate::error_convert::AppErrorExt;
use crate::repo;

/// Caller claims, if the request carries a valid access token.
///
/// Reads what `auth_middleware` put in the extensions and falls back to the
/// raw headers when the middleware did not run.
pub(crate) fn current_claims() -> Option<jwt::Claims> {
    let ctx = dioxus::fullstack::FullstackContext::current()?;
    let parts = ctx.parts_mut();

    if let Some(claims) = parts.extensions.get::<jwt::Claims>() {
        return Some(claims.clone());
    }

    cookies::extract_access_token(&parts.headers)
        .and_then(|token| jwt::validate_access_token(&token).ok())
}

/// Claims of the caller, or `Unauthorized`.
pub(crate) fn require_auth() -> Result<jwt::Claims, ServerFnError> {
    current_claims()
        .ok_or_else(|| AppError::unauthorized("Authentication required").into_server_fn_error())
}

/// Mint an access/refresh pair for `user`, persist the refresh hash and ask
/// the middleware to set both cookies.
pub(crate) async fn start_session(pool: &Pool<Postgres>, user: &AuthUser) -> Result<(), ServerFnError> {
    let internal = |e: jsonwebtoken::errors::Error| {
        tracing::error!(error = %e, "Token signing failed");
        AppError::internal("Could not start session").into_server_fn_error()
    };

    let access = jwt::create_access_token(user.id, &user.email).map_err(internal)?;
    let (refresh, expires_at) = jwt::create_refresh_token(user.id, &user.email).map_err(internal)?;

    repo::refresh_token::store(pool, user.id, &jwt::hash_token(&refresh), expires_at)
        .await
        .map_err(|e| e.into_server_fn_error())?;

    cookies::schedule_auth_cookies(&access, &refresh);
    Ok(())
}
