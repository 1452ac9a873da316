use dioxus::prelude::*;
use shared_types::{FeatureFlags, Section, ViewState};

use crate::notify::use_notifier;
use crate::session::use_session;

mod admin_dashboard;
mod home;
mod login;
mod not_found;
mod public_dashboard;
mod register;
mod submit;
mod user_dashboard;

use admin_dashboard::AdminDashboard;
use home::Home;
use login::{AdminLogin, UserLogin};
use not_found::NotFound;
use public_dashboard::PublicDashboard;
use register::Register;
use submit::SubmitComplaint;
use user_dashboard::UserDashboard;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
#[allow(clippy::enum_variant_names)]
pub enum Route {
    #[layout(DeskLayout)]
    #[route("/")]
    Home {},
    #[route("/complaints")]
    PublicDashboard {},
    #[route("/register")]
    Register {},
    #[route("/login")]
    UserLogin {},
    #[route("/admin/login")]
    AdminLogin {},
    #[route("/complaints/new")]
    SubmitComplaint {},
    #[route("/dashboard")]
    UserDashboard {},
    #[route("/admin")]
    AdminDashboard {},
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

impl From<Section> for Route {
    fn from(section: Section) -> Self {
        match section {
            Section::Home => Route::Home {},
            Section::PublicDashboard => Route::PublicDashboard {},
            Section::Register => Route::Register {},
            Section::UserLogin => Route::UserLogin {},
            Section::AdminLogin => Route::AdminLogin {},
            Section::SubmitComplaint => Route::SubmitComplaint {},
            Section::UserDashboard => Route::UserDashboard {},
            Section::AdminDashboard => Route::AdminDashboard {},
        }
    }
}

impl Route {
    pub fn section(&self) -> Option<Section> {
        match self {
            Route::Home {} => Some(Section::Home),
            Route::PublicDashboard {} => Some(Section::PublicDashboard),
            Route::Register {} => Some(Section::Register),
            Route::UserLogin {} => Some(Section::UserLogin),
            Route::AdminLogin {} => Some(Section::AdminLogin),
            Route::SubmitComplaint {} => Some(Section::SubmitComplaint),
            Route::UserDashboard {} => Some(Section::UserDashboard),
            Route::AdminDashboard {} => Some(Section::AdminDashboard),
            Route::NotFound { .. } => None,
        }
    }
}

/// Which visitor the navigation is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visitor {
    Guest,
    User,
    Admin,
}

/// Nav entries, in display order, for a visitor.
fn nav_links(visitor: Visitor, flags: &FeatureFlags) -> Vec<(Section, &'static str)> {
    let mut links = vec![(Section::Home, "Home")];
    if flags.public_dashboard {
        links.push((Section::PublicDashboard, "All Complaints"));
    }
    match visitor {
        Visitor::Guest => {
            if flags.registration {
                links.push((Section::Register, "Register"));
            }
            links.push((Section::UserLogin, "Login"));
            links.push((Section::AdminLogin, "Admin"));
        }
        Visitor::User => {
            links.push((Section::SubmitComplaint, "File Complaint"));
            links.push((Section::UserDashboard, "My Complaints"));
        }
        Visitor::Admin => links.push((Section::AdminDashboard, "Admin Dashboard")),
    }
    links
}

/// Navigation state shared by the layout and every page.
///
/// `refresh_epoch` ticks whenever a navigation lands on a dashboard, so a
/// dashboard re-fetches even when it is already mounted.
#[derive(Clone, Copy)]
pub struct DeskNav {
    pub view: Signal<ViewState>,
    pub refresh_epoch: Signal<u64>,
}

impl DeskNav {
    pub fn go(&mut self, section: Section) {
        if self.view.write().navigate(section).is_some() {
            *self.refresh_epoch.write() += 1;
        }
        navigator().push(Route::from(section));
    }
}

pub fn use_desk_nav() -> DeskNav {
    use_context::<DeskNav>()
}

/// Header, navigation and session restore around every page.
///
/// Suspends until `get_current_user` resolves so gated pages never see a
/// half-restored session.
#[component]
fn DeskLayout() -> Element {
    let route: Route = use_route();
    let flags: FeatureFlags = use_context();
    let mut session = use_session();
    let notifier = use_notifier();

    let mut nav = use_context_provider(|| DeskNav {
        view: Signal::new(ViewState::default()),
        refresh_epoch: Signal::new(0),
    });

    let restored =
        use_server_future(move || async move { server::api::get_current_user().await })?;

    use_hook(move || match restored.read().as_ref().cloned() {
        Some(Ok(Some(user))) => session.set_user(user),
        Some(Ok(None)) | Some(Err(_)) => session.clear(),
        None => {}
    });

    // Keep the active section in step with the URL.
    let section = route.section();
    use_effect(use_reactive!(|section| {
        if let Some(section) = section {
            nav.view.write().active = section;
        }
    }));

    // A gated page without a session, whether on arrival or after the
    // session ended elsewhere, goes to its login form.
    let signed_in = session.current_user.read().is_some();
    use_effect(use_reactive!(|(signed_in, section)| {
        if let Some(login) = section.and_then(|s| s.login_gate(signed_in)) {
            notifier.error("Please login first!");
            nav.go(login);
        }
    }));

    let visitor = match session.current_user.read().as_ref() {
        None => Visitor::Guest,
        Some(user) if user.is_admin => Visitor::Admin,
        Some(_) => Visitor::User,
    };
    let links = nav_links(visitor, &flags);
    let nav_open = nav.view.read().nav_open;
    let active = nav.view.read().active;

    let handle_logout = move |_| async move {
        match server::api::logout().await {
            Ok(()) => {
                session.clear();
                notifier.success("Logged out successfully!");
                nav.go(Section::Home);
            }
            Err(e) => notifier.failure(&e, "Error logging out"),
        }
    };

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./layout.css") }

        header { class: "desk-header",
            Link {
                class: "desk-brand",
                to: Route::Home {},
                onclick: move |_| nav.view.write().close_nav(),
                "Campus Complaint Desk"
            }
            button {
                class: "desk-nav-toggle",
                aria_label: "Toggle navigation",
                aria_expanded: nav_open,
                onclick: move |_| nav.view.write().toggle_nav(),
                if nav_open { "✕" } else { "☰" }
            }
            nav {
                class: if nav_open { "desk-nav desk-nav-open" } else { "desk-nav" },
                for (section, label) in links {
                    button {
                        key: "{label}",
                        class: if section == active { "desk-nav-link active" } else { "desk-nav-link" },
                        onclick: move |_| nav.go(section),
                        "{label}"
                    }
                }
                if visitor != Visitor::Guest {
                    button { class: "desk-nav-link desk-logout", onclick: handle_logout, "Logout" }
                }
            }
        }

        main { class: "desk-main",
            Outlet::<Route> {}
        }
    }
}
