use shared_types::CompanyRole;

use super::pipeline::DashboardUpdate;

/// Transient dashboard state, rebuilt on every mount.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub show_assessment: bool,
    pub user_role: Option<CompanyRole>,
    pub loading: bool,
    /// Company-wide count. Only fetched for admins.
    pub total_chats: i64,
    pub personal_chats: i64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            show_assessment: false,
            user_role: None,
            loading: true,
            total_chats: 0,
            personal_chats: 0,
        }
    }
}

impl DashboardState {
    pub fn apply(&mut self, update: &DashboardUpdate) {
        match update {
            DashboardUpdate::RedirectToAuth | DashboardUpdate::Identity(_) => {}
            DashboardUpdate::Role(role) => self.user_role = *role,
            DashboardUpdate::PersonalChats(count) => self.personal_chats = *count,
            DashboardUpdate::TotalChats(count) => self.total_chats = *count,
            DashboardUpdate::Finished => self.loading = false,
        }
    }

    pub fn start_assessment(&mut self) {
        self.show_assessment = true;
    }

    pub fn finish_assessment(&mut self) {
        self.show_assessment = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainPanel {
    CallToAction,
    Assessment,
}

/// What the dashboard shows, derived from [`DashboardState`] alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardView {
    Loading,
    Ready {
        main: MainPanel,
        show_history: bool,
        show_hr_tools: bool,
        company_count: Option<i64>,
        personal_count: Option<i64>,
    },
}

pub fn dashboard_view(state: &DashboardState) -> DashboardView {
    if state.loading {
        return DashboardView::Loading;
    }

    let idle = !state.show_assessment;
    DashboardView::Ready {
        main: if idle {
            MainPanel::CallToAction
        } else {
            MainPanel::Assessment
        },
        show_history: idle,
        show_hr_tools: state.user_role == Some(CompanyRole::Hr),
        company_count: (idle && state.user_role == Some(CompanyRole::Admin)).then_some(state.total_chats),
        personal_count: idle.then_some(state.personal_chats),
    }
}
