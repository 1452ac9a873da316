use dioxus::prelude::*;
use shared_types::dashboard::{render, CardAudience, DashboardFilters};
use shared_types::{ComplaintResponse, FeedScope, Section};
use shared_ui::components::{StatGrid, StatTile, StatTone};
use uuid::Uuid;

use crate::components::{
    BoardSkeleton, CategoryFilterSelect, ComplaintBoard, CounterTiles, Greeting,
    StatusFilterSelect,
};
use crate::notify::use_notifier;
use crate::routes::use_desk_nav;
use crate::session::use_session;

/// Every complaint, live through the `all` feed, with resolve actions.
#[component]
pub fn AdminDashboard() -> Element {
    let mut session = use_session();
    let notifier = use_notifier();
    let mut nav = use_desk_nav();
    let mut filters = use_signal(DashboardFilters::default);
    let snapshot = use_signal(|| Option::<Vec<ComplaintResponse>>::None);
    let mut resolving = use_signal(|| Option::<Uuid>::None);
    let on_error = use_callback(move |message: String| notifier.error(message));

    use_effect(move || {
        let _visit = *nav.refresh_epoch.read();
        let is_admin = session.current_user.peek().as_ref().map(|u| u.is_admin);
        match is_admin {
            None => {}
            Some(false) => nav.go(Section::UserDashboard),
            Some(true) => session.subscribe(FeedScope::All, snapshot, on_error),
        }
    });

    use_drop(move || session.unsubscribe(FeedScope::All));

    // Re-read alongside every `all` snapshot.
    let user_count = use_resource(move || {
        let _visit = *nav.refresh_epoch.read();
        let _snapshot = snapshot.read().as_ref().map(Vec::len);
        async move {
            match server::api::count_users().await {
                Ok(count) => Some(count.total),
                Err(e) => {
                    tracing::warn!(error = %e, "could not count users");
                    None
                }
            }
        }
    });

    let handle_resolve = move |id: Uuid| async move {
        resolving.set(Some(id));
        match server::api::resolve_complaint(id).await {
            Ok(_) => notifier.success("Complaint marked as resolved!"),
            Err(e) => notifier.failure(&e, "Error updating complaint"),
        }
        resolving.set(None);
    };

    let Some(profile) = session.current_user.read().clone() else {
        return rsx! {};
    };
    if !profile.is_admin {
        return rsx! {};
    }

    let current = filters.read().clone();
    let view = snapshot
        .read()
        .as_ref()
        .map(|list| render(list, &current, CardAudience::Admin));
    let users = users_label(user_count.read().as_ref());

    rsx! {
        Greeting { profile, title: "Admin dashboard" }
        StatGrid {
            StatTile { label: "Registered users", value: users, tone: StatTone::Info }
        }
        match view {
            Some(view) => rsx! {
                CounterTiles { counters: view.counters }
                div { class: "board-filters",
                    StatusFilterSelect {
                        value: current.status,
                        onchange: move |status| filters.write().status = status,
                    }
                    CategoryFilterSelect {
                        value: current.category.clone(),
                        onchange: move |category| filters.write().category = category,
                    }
                }
                ComplaintBoard {
                    view,
                    on_resolve: move |id| {
                        spawn(handle_resolve(id));
                    },
                    resolving: resolving(),
                }
            },
            None => rsx! { BoardSkeleton {} },
        }
    }
}

/// Tile text for the registered-user count. A dash until the first count lands
/// or when counting failed.
fn users_label(count: Option<&Option<i64>>) -> String {
    match count {
        Some(Some(total)) => total.to_string(),
        _ => "-".to_string(),
    }
}
