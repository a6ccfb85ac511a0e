use dioxus::prelude::*;
use shared_types::{AssessmentScope, CompanyMembership};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::error_convert::AppErrorExt;

#[cfg(feature = "server")]
use crate::repo;

#[cfg(feature = "server")]
use super::{auth::*, policy};

/// Membership of `user_id`, who must be the caller.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_company_membership(user_id: i64) -> Result<Option<CompanyMembership>, ServerFnError> {
    let claims = require_auth()?;
    policy::authorize_membership_lookup(claims.sub, user_id).map_err(|e| e.into_server_fn_error())?;

    let db = get_db().await;
    repo::membership::find_for_user(db, user_id)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Number of stored assessments in `scope`.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn count_assessments(scope: AssessmentScope) -> Result<i64, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;

    let count = match scope {
        AssessmentScope::User(user_id) => {
            policy::authorize_count(claims.sub, None, scope).map_err(|e| e.into_server_fn_error())?;
            repo::analysis::count_for_user(db, user_id).await
        }
        AssessmentScope::Company(company_id) => {
            let membership = repo::membership::find_for_user(db, claims.sub)
                .await
                .map_err(|e| e.into_server_fn_error())?;
            policy::authorize_count(claims.sub, membership.as_ref(), scope)
                .map_err(|e| e.into_server_fn_error())?;
            repo::analysis::count_for_company(db, company_id).await
        }
    };

    count.map_err(|e| e.into_server_fn_error())
}
