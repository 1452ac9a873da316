use serde::{Deserialize, Serialize};

/// Named page sections. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Section {
    #[default]
    Home,
    PublicDashboard,
    Register,
    UserLogin,
    AdminLogin,
    SubmitComplaint,
    UserDashboard,
    AdminDashboard,
}

/// Dashboards whose data reloads when their section is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashboardRefresh {
    Public,
    User,
    Admin,
}

impl Section {
    pub fn refresh(&self) -> Option<DashboardRefresh> {
        match self {
            Section::PublicDashboard => Some(DashboardRefresh::Public),
            Section::UserDashboard => Some(DashboardRefresh::User),
            Section::AdminDashboard => Some(DashboardRefresh::Admin),
            _ => None,
        }
    }

    /// Sections that only make sense with a session.
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Section::SubmitComplaint | Section::UserDashboard | Section::AdminDashboard
        )
    }

    /// Login form a visitor without a session is sent to from this section.
    pub fn login_gate(&self, signed_in: bool) -> Option<Section> {
        if signed_in || !self.requires_session() {
            return None;
        }
        Some(match self {
            Section::AdminDashboard => Section::AdminLogin,
            _ => Section::UserLogin,
        })
    }
}

/// Active section plus the mobile navigation overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub active: Section,
    pub nav_open: bool,
}

impl ViewState {
    /// Jump straight to `section`. There is no history to unwind.
    pub fn navigate(&mut self, section: Section) -> Option<DashboardRefresh> {
        self.active = section;
        self.nav_open = false;
        section.refresh()
    }

    pub fn toggle_nav(&mut self) {
        self.nav_open = !self.nav_open;
    }

    pub fn close_nav(&mut self) {
        self.nav_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigate_closes_overlay() {
        let mut view = ViewState::default();
        view.toggle_nav();
        assert!(view.nav_open);
        view.navigate(Section::Register);
        assert!(!view.nav_open);
        assert_eq!(view.active, Section::Register);
    }

    #[test]
    fn dashboards_request_refresh() {
        let mut view = ViewState::default();
        assert_eq!(view.navigate(Section::PublicDashboard), Some(DashboardRefresh::Public));
        assert_eq!(view.navigate(Section::UserDashboard), Some(DashboardRefresh::User));
        assert_eq!(view.navigate(Section::AdminDashboard), Some(DashboardRefresh::Admin));
        assert_eq!(view.navigate(Section::AdminLogin), None);
    }

    #[test]
    fn revisiting_a_section_refreshes_again() {
        let mut view = ViewState::default();
        view.navigate(Section::UserDashboard);
        assert_eq!(view.navigate(Section::UserDashboard), Some(DashboardRefresh::User));
    }

    #[test]
    fn session_gated_sections() {
        assert!(Section::SubmitComplaint.requires_session());
        assert!(!Section::PublicDashboard.requires_session());
    }

    #[test]
    fn losing_the_session_on_a_gated_page_goes_to_the_matching_login() {
        assert_eq!(Section::UserDashboard.login_gate(false), Some(Section::UserLogin));
        assert_eq!(Section::SubmitComplaint.login_gate(false), Some(Section::UserLogin));
        assert_eq!(Section::AdminDashboard.login_gate(false), Some(Section::AdminLogin));
    }

    #[test]
    fn open_pages_and_live_sessions_stay_put() {
        assert_eq!(Section::Home.login_gate(false), None);
        assert_eq!(Section::PublicDashboard.login_gate(false), None);
        assert_eq!(Section::UserDashboard.login_gate(true), None);
    }
}
