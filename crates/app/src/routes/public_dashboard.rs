use dioxus::prelude::*;
use shared_types::dashboard::{render, CardAudience, DashboardFilters};
use shared_types::FeatureFlags;
use shared_ui::components::{PageHeader, PageSubtitle, PageTitle};

use crate::components::{BoardSkeleton, ComplaintBoard, CounterTiles, StatusFilterSelect};
use crate::notify::{failure_message, use_notifier};
use crate::routes::use_desk_nav;

/// Every complaint, without submitter details. Fetched once per visit.
#[component]
pub fn PublicDashboard() -> Element {
    let flags: FeatureFlags = use_context();
    let nav = use_desk_nav();
    let notifier = use_notifier();
    let mut filters = use_signal(DashboardFilters::default);

    let complaints = use_resource(move || {
        let _visit = *nav.refresh_epoch.read();
        async move { server::api::list_public_complaints().await }
    });

    use_effect(move || {
        if let Some(Err(e)) = complaints.read().as_ref() {
            notifier.error(failure_message(&e.to_string(), "Error loading complaints"));
        }
    });

    if !flags.public_dashboard {
        return rsx! {
            PageHeader {
                PageTitle { "Complaints" }
                PageSubtitle { "The public board is turned off." }
            }
        };
    }

    let current = filters.read().clone();
    let view = complaints
        .read()
        .as_ref()
        .map(|result| render(result.as_deref().unwrap_or(&[]), &current, CardAudience::Public));

    rsx! {
        PageHeader {
            PageTitle { "Campus complaints" }
            PageSubtitle { "Everything reported so far, newest first." }
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
