use dioxus::prelude::*;
use shared_types::{FeatureFlags, Section};
use shared_ui::components::{Button, ButtonVariant, PageHeader, PageSubtitle, PageTitle};

use crate::routes::use_desk_nav;
use crate::session::use_session;

/// Landing page. A signed-in visitor goes straight to their dashboard.
#[component]
pub fn Home() -> Element {
    let session = use_session();
    let flags: FeatureFlags = use_context();
    let mut nav = use_desk_nav();

    use_effect(move || {
        let landing = session.current_user.read().as_ref().map(|user| {
            if user.is_admin {
                Section::AdminDashboard
            } else {
                Section::UserDashboard
            }
        });
        if let Some(section) = landing {
            nav.go(section);
        }
    });

    rsx! {
        div { class: "home-hero",
            PageHeader {
                PageTitle { "Campus Complaint Desk" }
                PageSubtitle {
                    "Report broken facilities, hostel issues and anything else that needs fixing. "
                    "Track every complaint until it is resolved."
                }
            }
            div { class: "home-actions",
                if flags.registration {
                    Button { onclick: move |_| nav.go(Section::Register), "Create an account" }
                }
                Button {
                    variant: ButtonVariant::Outline,
                    onclick: move |_| nav.go(Section::UserLogin),
                    "Student login"
                }
                if flags.public_dashboard {
                    Button {
                        variant: ButtonVariant::Ghost,
                        onclick: move |_| nav.go(Section::PublicDashboard),
                        "Browse complaints"
                    }
                }
            }
        }
    }
}
