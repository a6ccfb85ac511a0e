use dioxus::prelude::*;
use shared_types::{ConversationAnalysis, SaveAnalysisRequest};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::error_convert::{AppErrorExt, ValidateRequest};

#[cfg(feature = "server")]
use crate::repo;

#[cfg(feature = "server")]
use super::{auth::*, policy};

/// Store a finished check-in for the caller, tagged with their company.
#[cfg_attr(feature = "server", tracing::instrument(skip(req), fields(mood = req.mood_score)))]
#[server]
pub async fn save_conversation_analysis(
    req: SaveAnalysisRequest,
) -> Result<ConversationAnalysis, ServerFnError> {
    let claims = require_auth()?;
    req.validate_request().map_err(|e| e.into_server_fn_error())?;
    let turns = shared_types::canonical_transcript(&req.turns).map_err(|e| e.into_server_fn_error())?;

    let db = get_db().await;
    let company_id = repo::membership::find_for_user(db, claims.sub)
        .await
        .map_err(|e| e.into_server_fn_error())?
        .and_then(|m| m.company_id);

    let summary = shared_types::summarize(req.mood_score, &turns);
    let saved = repo::analysis::create(db, claims.sub, company_id, req.mood_score, &summary, &turns)
        .await
        .map_err(|e| e.into_server_fn_error())?;

    tracing::info!(analysis_id = %saved.id, user_id = claims.sub, "Check-in saved");
    Ok(saved)
}

/// The caller's own check-ins, newest first.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn list_my_analyses(limit: i64) -> Result<Vec<ConversationAnalysis>, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    repo::analysis::list_for_user(db, claims.sub, policy::clamp_limit(limit))
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Check-ins across the caller's company. HR and admins only.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn list_company_analyses(limit: i64) -> Result<Vec<ConversationAnalysis>, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;

    let membership = repo::membership::find_for_user(db, claims.sub)
        .await
        .map_err(|e| e.into_server_fn_error())?;
    let company_id =
        policy::company_report_scope(membership.as_ref()).map_err(|e| e.into_server_fn_error())?;

    repo::analysis::list_for_company(db, company_id, policy::clamp_limit(limit))
        .await
        .map_err(|e| e.into_server_fn_error())
}
