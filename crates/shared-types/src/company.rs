use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's role inside their company.
///
/// Stored lowercase in `company_members.role`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompanyRole {
    Admin,
    Hr,
    Member,
}

impl CompanyRole {
    /// Parse a stored role. Unknown values are treated as a regular member.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "admin" => CompanyRole::Admin,
            "hr" => CompanyRole::Hr,
            _ => CompanyRole::Member,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyRole::Admin => "admin",
            CompanyRole::Hr => "hr",
            CompanyRole::Member => "member",
        }
    }

    /// Roles allowed to read company-wide analyses.
    pub fn can_view_company_reports(&self) -> bool {
        matches!(self, CompanyRole::Admin | CompanyRole::Hr)
    }
}

/// Membership of a user in a company. At most one per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyMembership {
    pub user_id: i64,
    pub company_id: Option<Uuid>,
    pub role: CompanyRole,
}

/// What a count of assessments is filtered by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssessmentScope {
    User(i64),
    Company(Uuid),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles_case_insensitively() {
        assert_eq!(CompanyRole::from_str_or_default("admin"), CompanyRole::Admin);
        assert_eq!(CompanyRole::from_str_or_default("HR"), CompanyRole::Hr);
        assert_eq!(CompanyRole::from_str_or_default(" member "), CompanyRole::Member);
    }

    #[test]
    fn unknown_role_is_member() {
        assert_eq!(CompanyRole::from_str_or_default("owner"), CompanyRole::Member);
        assert_eq!(CompanyRole::from_str_or_default(""), CompanyRole::Member);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&CompanyRole::Hr).unwrap(), "\"hr\"");
        let role: CompanyRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, CompanyRole::Admin);
    }

    #[test]
    fn only_admin_and_hr_see_company_reports() {
        assert!(CompanyRole::Admin.can_view_company_reports());
        assert!(CompanyRole::Hr.can_view_company_reports());
        assert!(!CompanyRole::Member.can_view_company_reports());
    }
}
