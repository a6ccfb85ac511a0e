use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use sqlx::{Pool, Postgres};

use super::cookies::{self, CookieSlot, PendingCookieAction};
use super::jwt::{self, hash_token, Claims};
use crate::repo;

/// Session middleware for every request.
///
/// Puts valid access-token `Claims` into the request extensions, rotating the
/// pair through the refresh cookie when the access token is missing or stale.
/// Installs a `CookieSlot` so server functions can set or clear cookies.
/// Unauthenticated requests pass through; handlers decide what they need.
pub async fn auth_middleware(
    State(pool): State<Pool<Postgres>>,
    mut req: Request,
    next: Next,
) -> Response {
    let claims = cookies::extract_access_token(req.headers())
        .and_then(|token| jwt::validate_access_token(&token).ok());

    let mut rotated = None;
    match claims {
        Some(claims) => {
            req.extensions_mut().insert(claims);
        }
        None => {
            if let Some(refresh) = cookies::extract_refresh_token(req.headers()) {
                if let Some((claims, pair)) = rotate_session(&pool, &refresh).await {
                    req.extensions_mut().insert(claims);
                    rotated = Some(pair);
                }
            }
        }
    }

    let slot = CookieSlot::default();
    req.extensions_mut().insert(slot.clone());

    let mut response = next.run(req).await;

    // A cookie action from the handler (login, logout) wins over a rotation.
    match slot.take() {
        Some(PendingCookieAction::Set {
            access_token,
            refresh_token,
        }) => cookies::set_auth_cookies(response.headers_mut(), &access_token, &refresh_token),
        Some(PendingCookieAction::Clear) => cookies::clear_auth_cookies(response.headers_mut()),
        None => {
            if let Some((access, refresh)) = rotated {
                cookies::set_auth_cookies(response.headers_mut(), &access, &refresh);
            }
        }
    }

    response
}

/// Swap a live refresh token for a new access/refresh pair.
async fn rotate_session(pool: &Pool<Postgres>, refresh_token: &str) -> Option<(Claims, (String, String))> {
    let old = jwt::validate_refresh_token(refresh_token).ok()?;

    match repo::refresh_token::consume(pool, old.sub, &hash_token(refresh_token)).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(user_id = old.sub, "Refresh token unknown, revoked or expired");
            return None;
        }
        Err(e) => {
            tracing::error!(user_id = old.sub, error = %e, "Refresh token lookup failed");
            return None;
        }
    }

    let access = jwt::create_access_token(old.sub, &old.email).ok()?;
    let (refresh, expires_at) = jwt::create_refresh_token(old.sub, &old.email).ok()?;

    if let Err(e) = repo::refresh_token::store(pool, old.sub, &hash_token(&refresh), expires_at).await {
        tracing::error!(user_id = old.sub, error = %e, "Could not store rotated refresh token");
        return None;
    }

    let claims = jwt::validate_access_token(&access).ok()?;
    tracing::info!(user_id = claims.sub, "Session refreshed");
    Some((claims, (access, refresh)))
}
