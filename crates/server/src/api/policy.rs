//! Authorization rules for scoped reads. Pure functions so they can be
//! checked without a database.

use shared_types::{AppError, AssessmentScope, CompanyMembership, CompanyRole};

/// Largest page any list endpoint returns.
pub const MAX_LIST_LIMIT: i64 = 50;

/// Clamp a requested page size into `1..=MAX_LIST_LIMIT`.
pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_LIST_LIMIT)
}

/// Users may only read their own membership.
pub fn authorize_membership_lookup(caller_id: i64, user_id: i64) -> Result<(), AppError> {
    if caller_id == user_id {
        Ok(())
    } else {
        Err(AppError::forbidden("You can only view your own membership"))
    }
}

/// `User` scope is limited to the caller. `Company` scope needs the caller
/// to be an admin of that same company.
pub fn authorize_count(
    caller_id: i64,
    membership: Option<&CompanyMembership>,
    scope: AssessmentScope,
) -> Result<(), AppError> {
    match scope {
        AssessmentScope::User(user_id) if user_id == caller_id => Ok(()),
        AssessmentScope::User(_) => Err(AppError::forbidden("You can only count your own assessments")),
        AssessmentScope::Company(company_id) => match membership {
            Some(m) if m.role == CompanyRole::Admin && m.company_id == Some(company_id) => Ok(()),
            _ => Err(AppError::forbidden("Company admin role required")),
        },
    }
}

/// Company to list reports for: the caller's own, and only for hr or admin.
pub fn company_report_scope(membership: Option<&CompanyMembership>) -> Result<uuid::Uuid, AppError> {
    membership
        .filter(|m| m.role.can_view_company_reports())
        .and_then(|m| m.company_id)
        .ok_or_else(|| AppError::forbidden("HR or admin role required"))
}
