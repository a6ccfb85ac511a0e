use dioxus::prelude::*;
use shared_types::{AuthUser, FeatureFlags};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::error_convert::{AppErrorExt, ValidateRequest};

#[cfg(feature = "server")]
use crate::repo;

#[cfg(feature = "server")]
use super::auth::*;

/// Flags from `config.toml`.
#[server]
pub async fn get_feature_flags() -> Result<FeatureFlags, ServerFnError> {
    Ok(crate::config::feature_flags().clone())
}

/// Create an account and sign it in.
#[cfg_attr(feature = "server", tracing::instrument(skip(password)))]
#[server]
pub async fn register(
    email: String,
    password: String,
    display_name: String,
) -> Result<AuthUser, ServerFnError> {
    use crate::auth::password;
    use shared_types::RegisterRequest;

    let req = RegisterRequest {
        email: email.trim().to_string(),
        password,
        display_name: display_name.trim().to_string(),
    };
    req.validate_request().map_err(|e| e.into_server_fn_error())?;

    let hash = password::hash_password(&req.password).map_err(|e| e.into_server_fn_error())?;

    let db = get_db().await;
    let user = repo::user::create(db, &req.email, &req.display_name, &hash)
        .await
        .map_err(|e| e.into_server_fn_error())?;

    start_session(db, &user).await?;
    tracing::info!(user_id = user.id, "Account created");
    Ok(user)
}

/// Sign in with email and password.
#[cfg_attr(feature = "server", tracing::instrument(skip(password)))]
#[server]
pub async fn login(email: String, password: String) -> Result<AuthUser, ServerFnError> {
    use crate::auth::password as pw;
    use shared_types::{AppError, LoginRequest};

    let req = LoginRequest {
        email: email.trim().to_string(),
        password,
    };
    req.validate_request().map_err(|e| e.into_server_fn_error())?;

    let db = get_db().await;
    let invalid = || AppError::unauthorized("Invalid email or password").into_server_fn_error();

    let credentials = repo::user::find_credentials_by_email(db, &req.email)
        .await
        .map_err(|e| e.into_server_fn_error())?
        .ok_or_else(invalid)?;

    if !pw::verify_password(&req.password, &credentials.password_hash) {
        tracing::warn!(user_id = credentials.id, "Failed login attempt");
        return Err(invalid());
    }

    let user = AuthUser::from(credentials);
    start_session(db, &user).await?;
    tracing::info!(user_id = user.id, "Signed in");
    Ok(user)
}

/// Revoke the caller's refresh tokens and clear the session cookies.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn logout() -> Result<(), ServerFnError> {
    if let Some(claims) = current_claims() {
        let db = get_db().await;
        match repo::refresh_token::revoke_all_for_user(db, claims.sub).await {
            Ok(revoked) => tracing::info!(user_id = claims.sub, revoked, "Signed out"),
            Err(e) => tracing::error!(user_id = claims.sub, error = %e, "Could not revoke refresh tokens"),
        }
    }

    crate::auth::cookies::schedule_clear_cookies();
    Ok(())
}

/// The signed-in user, or `None` without a valid session.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_current_user() -> Result<Option<AuthUser>, ServerFnError> {
    let Some(claims) = current_claims() else {
        return Ok(None);
    };

    let db = get_db().await;
    let user = repo::user::find_by_id(db, claims.sub)
        .await
        .map_err(|e| e.into_server_fn_error())?;

    if user.is_none() {
        tracing::warn!(user_id = claims.sub, "Session for a user that no longer exists");
        crate::auth::cookies::schedule_clear_cookies();
    }
    Ok(user)
}
