use dioxus::prelude::*;
use shared_types::dashboard::{render, CardAudience, DashboardFilters};
use shared_types::{ComplaintResponse, FeedScope, Section};
use shared_ui::components::{Button, PageActions};

use crate::components::{
    BoardSkeleton, ComplaintBoard, CounterTiles, Greeting, StatusFilterSelect,
};
use crate::notify::use_notifier;
use crate::routes::use_desk_nav;
use crate::session::use_session;

/// The signed-in student's complaints, kept live through the `mine` feed.
#[component]
pub fn UserDashboard() -> Element {
    let mut session = use_session();
    let notifier = use_notifier();
    let mut nav = use_desk_nav();
    let mut filters = use_signal(DashboardFilters::default);
    let snapshot = use_signal(|| Option::<Vec<ComplaintResponse>>::None);
    let on_error = use_callback(move |message: String| notifier.error(message));

    use_effect(move || {
        let _visit = *nav.refresh_epoch.read();
        let is_admin = session.current_user.peek().as_ref().map(|u| u.is_admin);
        // Signed-out visitors are redirected by the layout.
        match is_admin {
            None => {}
            Some(true) => nav.go(Section::AdminDashboard),
            Some(false) => session.subscribe(FeedScope::Mine, snapshot, on_error),
        }
    });

    use_drop(move || session.unsubscribe(FeedScope::Mine));

    let Some(profile) = session.current_user.read().clone() else {
        return rsx! {};
    };

    let current = filters.read().clone();
    let view = snapshot
        .read()
        .as_ref()
        .map(|list| render(list, &current, CardAudience::Owner));

    rsx! {
        Greeting { profile, title: "My complaints" }
        PageActions {
            Button { onclick: move |_| nav.go(Section::SubmitComplaint), "File a complaint" }
        }
        match view {
            Some(view) => rsx! {
                CounterTiles { counters: view.counters }
                div { class: "board-filters",
                    StatusFilterSelect {
                        value: current.status,
                        onchange: move |status| filters.write().status = status,
                    }
                }
                ComplaintBoard { view }
            },
            None => rsx! { BoardSkeleton {} },
        }
    }
}
