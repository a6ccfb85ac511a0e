//! Dashboard resolution: identity, membership, personal count, then the
//! company count for admins. Each step soft-fails; results are reported
//! through a [`DashboardSink`] so the pipeline never touches UI state itself.

use dioxus::prelude::ServerFnError;
use shared_types::{AppError, AssessmentScope, AuthUser, CompanyMembership, CompanyRole};
use std::cell::Cell;
use std::rc::Rc;
use uuid::Uuid;

/// Data the dashboard needs from the backend.
#[allow(async_fn_in_trait)]
pub trait DashboardBackend {
    async fn current_user(&self) -> Result<Option<AuthUser>, AppError>;
    async fn membership(&self, user_id: i64) -> Result<Option<CompanyMembership>, AppError>;
    async fn count_assessments(&self, scope: AssessmentScope) -> Result<i64, AppError>;
}

/// Backend that calls the server functions.
pub struct ServerBackend;

fn into_app_error(err: ServerFnError) -> AppError {
    let raw = err.to_string();
    AppError::from_server_error(&raw).unwrap_or_else(|| AppError::internal(raw))
}

impl DashboardBackend for ServerBackend {
    async fn current_user(&self) -> Result<Option<AuthUser>, AppError> {
        server::api::get_current_user().await.map_err(into_app_error)
    }

    async fn membership(&self, user_id: i64) -> Result<Option<CompanyMembership>, AppError> {
        server::api::get_company_membership(user_id)
            .await
            .map_err(into_app_error)
    }

    async fn count_assessments(&self, scope: AssessmentScope) -> Result<i64, AppError> {
        server::api::count_assessments(scope).await.map_err(into_app_error)
    }
}

/// Where the pipeline currently is. Each variant carries what its step needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveStage {
    Identity,
    Membership { user_id: i64 },
    PersonalCount { user_id: i64, membership: Option<CompanyMembership> },
    CompanyCount { company_id: Uuid },
    Done,
}

/// One observable result of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardUpdate {
    /// No session. Nothing else is reported after this.
    RedirectToAuth,
    Identity(AuthUser),
    Role(Option<CompanyRole>),
    PersonalChats(i64),
    TotalChats(i64),
    Finished,
}

pub trait DashboardSink {
    fn apply(&mut self, update: DashboardUpdate);
}

/// Forwards updates to `inner` only while `alive` is set. The owning
/// component clears the flag when it unmounts.
pub struct LiveSink<S> {
    alive: Rc<Cell<bool>>,
    inner: S,
}

impl<S> LiveSink<S> {
    pub fn new(alive: Rc<Cell<bool>>, inner: S) -> Self {
        Self { alive, inner }
    }
}

impl<S: DashboardSink> DashboardSink for LiveSink<S> {
    fn apply(&mut self, update: DashboardUpdate) {
        if !self.alive.get() {
            tracing::debug!(?update, "Dashboard unmounted, dropping update");
            return;
        }
        self.inner.apply(update);
    }
}

/// Company whose total should be fetched: only an admin's, and only when the
/// membership names one.
pub fn company_count_target(membership: Option<&CompanyMembership>) -> Option<Uuid> {
    membership
        .filter(|m| m.role == CompanyRole::Admin)
        .and_then(|m| m.company_id)
}

pub fn should_fetch_company_count(membership: Option<&CompanyMembership>) -> bool {
    company_count_target(membership).is_some()
}

/// Run every stage once, in order.
pub async fn resolve_dashboard<B, S>(backend: &B, sink: &mut S)
where
    B: DashboardBackend,
    S: DashboardSink,
{
    let mut stage = ResolveStage::Identity;

    loop {
        tracing::debug!(?stage, "Dashboard stage");
        stage = match stage {
            ResolveStage::Identity => match backend.current_user().await {
                Ok(Some(user)) => {
                    let user_id = user.id;
                    sink.apply(DashboardUpdate::Identity(user));
                    ResolveStage::Membership { user_id }
                }
                Ok(None) => {
                    sink.apply(DashboardUpdate::RedirectToAuth);
                    return;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Could not resolve the current user");
                    ResolveStage::Done
                }
            },
            ResolveStage::Membership { user_id } => {
                let membership = match backend.membership(user_id).await {
                    Ok(membership) => membership,
                    Err(e) => {
                        tracing::error!(user_id, error = %e, "Could not load company membership");
                        None
                    }
                };
                sink.apply(DashboardUpdate::Role(membership.as_ref().map(|m| m.role)));
                ResolveStage::PersonalCount { user_id, membership }
            }
            ResolveStage::PersonalCount { user_id, membership } => {
                match backend.count_assessments(AssessmentScope::User(user_id)).await {
                    Ok(count) => sink.apply(DashboardUpdate::PersonalChats(count)),
                    Err(e) => tracing::error!(user_id, error = %e, "Could not count personal assessments"),
                }
                match company_count_target(membership.as_ref()) {
                    Some(company_id) => ResolveStage::CompanyCount { company_id },
                    None => ResolveStage::Done,
                }
            }
            ResolveStage::CompanyCount { company_id } => {
                match backend.count_assessments(AssessmentScope::Company(company_id)).await {
                    Ok(count) => sink.apply(DashboardUpdate::TotalChats(count)),
                    Err(e) => tracing::error!(%company_id, error = %e, "Could not count company assessments"),
                }
                ResolveStage::Done
            }
            ResolveStage::Done => {
                sink.apply(DashboardUpdate::Finished);
                return;
            }
        };
    }
}
