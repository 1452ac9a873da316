use dioxus::prelude::*;
use shared_types::dashboard::{
    CategoryFilter, ComplaintCard, DashboardCounters, DashboardView, StatusFilter,
};
use shared_types::{category_label, ComplaintStatus, COMPLAINT_CATEGORIES};
use shared_ui::components::{
    Badge, BadgeVariant, Button, ButtonVariant, Card, CardContent, CardFooter, CardHeader,
    FormSelect, Skeleton, StatGrid, StatTile, StatTone,
};
use uuid::Uuid;

/// Total / resolved / pending / rate tiles.
#[component]
pub fn CounterTiles(counters: DashboardCounters) -> Element {
    rsx! {
        StatGrid {
            StatTile { label: "Total", value: counters.total.to_string() }
            StatTile { label: "Resolved", value: counters.resolved.to_string(), tone: StatTone::Success }
            StatTile { label: "Pending", value: counters.pending.to_string(), tone: StatTone::Warning }
            StatTile {
                label: "Resolution Rate",
                value: format!("{}%", counters.resolution_rate),
                tone: StatTone::Info,
            }
        }
    }
}

#[component]
pub fn StatusFilterSelect(value: StatusFilter, onchange: EventHandler<StatusFilter>) -> Element {
    rsx! {
        FormSelect {
            label: "Status",
            value: value.value().to_string(),
            onchange: move |evt: Event<FormData>| onchange.call(StatusFilter::from_value(&evt.value())),
            option { value: "all", "All" }
            option { value: ComplaintStatus::Pending.as_str(), "{ComplaintStatus::Pending.label()}" }
            option { value: ComplaintStatus::Resolved.as_str(), "{ComplaintStatus::Resolved.label()}" }
        }
    }
}

#[component]
pub fn CategoryFilterSelect(
    value: CategoryFilter,
    onchange: EventHandler<CategoryFilter>,
) -> Element {
    rsx! {
        FormSelect {
            label: "Category",
            value: value.value().to_string(),
            onchange: move |evt: Event<FormData>| onchange.call(CategoryFilter::from_value(&evt.value())),
            option { value: "all", "All" }
            for slug in COMPLAINT_CATEGORIES.iter() {
                option { key: "{slug}", value: *slug, "{category_label(slug)}" }
            }
        }
    }
}

/// Placeholder rows while the first snapshot is in flight.
#[component]
pub fn BoardSkeleton() -> Element {
    rsx! {
        div { class: "board-cards",
            for i in 0..3 {
                Skeleton { key: "{i}", class: "board-card-skeleton" }
            }
        }
    }
}

/// The cards of a rendered dashboard, or its placeholder.
///
/// `on_resolve` is only offered on cards that allow it.
#[component]
pub fn ComplaintBoard(
    view: DashboardView,
    #[props(default)] on_resolve: Option<EventHandler<Uuid>>,
    #[props(default)] resolving: Option<Uuid>,
) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./complaint_board.css") }

        if let Some(placeholder) = view.placeholder.clone() {
            p { class: "board-empty", "{placeholder}" }
        } else {
            div { class: "board-cards",
                for card in view.cards.clone() {
                    ComplaintCardView {
                        key: "{card.id}",
                        busy: resolving == Some(card.id),
                        on_resolve,
                        card,
                    }
                }
            }
        }
    }
}

fn status_variant(status: ComplaintStatus) -> BadgeVariant {
    match status {
        ComplaintStatus::Pending => BadgeVariant::Warning,
        ComplaintStatus::Resolved => BadgeVariant::Success,
    }
}

#[component]
fn ComplaintCardView(
    card: ComplaintCard,
    busy: bool,
    on_resolve: Option<EventHandler<Uuid>>,
) -> Element {
    let id = card.id;
    let urgency_variant = if card.high_urgency {
        BadgeVariant::Destructive
    } else {
        BadgeVariant::Secondary
    };

    rsx! {
        Card { class: if card.high_urgency { "board-card board-card-urgent" } else { "board-card" },
            CardHeader {
                div { class: "board-card-badges",
                    Badge { variant: BadgeVariant::Outline, "{card.category_label}" }
                    Badge { variant: status_variant(card.status), "{card.status.label()}" }
                    Badge { variant: urgency_variant, "{card.urgency.label()}" }
                }
            }
            CardContent {
                p { class: "board-card-location", "{card.location}" }
                p { class: "board-card-description", "{card.description}" }
                if let Some(submitter) = &card.submitter {
                    p { class: "board-card-submitter", "{submitter.name} ({submitter.student_id})" }
                }
                p { class: "board-card-date", "{card.date_label}" }
            }
            if card.can_resolve {
                if let Some(handler) = on_resolve {
                    CardFooter {
                        Button {
                            variant: ButtonVariant::Success,
                            disabled: busy,
                            onclick: move |_| handler.call(id),
                            if busy { "Resolving..." } else { "Mark Resolved" }
                        }
                    }
                }
            }
        }
    }
}
