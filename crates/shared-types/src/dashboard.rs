//! Dashboard view models.
//!
//! Everything here is a pure function of the complaint snapshot the client
//! currently holds plus the filter selection. The Dioxus pages only turn the
//! resulting [`DashboardView`] into markup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::complaint::{category_label, ComplaintResponse, ComplaintStatus, Urgency};

/// Status filter: exact match or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ComplaintStatus),
}

impl StatusFilter {
    /// Parse the value of a `<select>`; unknown values mean "all".
    pub fn from_value(value: &str) -> Self {
        ComplaintStatus::parse(value).map_or(StatusFilter::All, StatusFilter::Only)
    }

    pub fn value(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    fn matches(&self, status: ComplaintStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

/// Category filter: exact match or everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn from_value(value: &str) -> Self {
        if value.is_empty() || value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub fn value(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category,
        }
    }

    fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardFilters {
    pub status: StatusFilter,
    pub category: CategoryFilter,
}

/// Aggregate counters, always computed over the unfiltered snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardCounters {
    pub total: usize,
    pub resolved: usize,
    pub pending: usize,
    /// Whole percent in `0..=100`.
    pub resolution_rate: u8,
}

impl DashboardCounters {
    pub fn from_list(list: &[ComplaintResponse]) -> Self {
        let total = list.len();
        let resolved = list
            .iter()
            .filter(|c| c.status == ComplaintStatus::Resolved)
            .count();
        Self {
            total,
            resolved,
            pending: total - resolved,
            resolution_rate: resolution_rate(resolved, total),
        }
    }
}

/// `round(resolved / total * 100)`, or 0 for an empty list.
pub fn resolution_rate(resolved: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rate = (resolved.min(total) as f64 / total as f64 * 100.0).round();
    rate as u8
}

/// Who is looking at the cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardAudience {
    Public,
    Owner,
    Admin,
}

impl CardAudience {
    pub fn empty_message(&self) -> &'static str {
        match self {
            CardAudience::Owner => "No complaints submitted yet.",
            CardAudience::Public | CardAudience::Admin => "No complaints found.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitterLine {
    pub name: String,
    pub student_id: String,
}

/// One rendered complaint card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintCard {
    pub id: Uuid,
    pub category: String,
    pub category_label: String,
    pub status: ComplaintStatus,
    pub location: String,
    pub description: String,
    pub submitter: Option<SubmitterLine>,
    pub date_label: String,
    pub urgency: Urgency,
    pub high_urgency: bool,
    /// Only admins see a resolve action, and only while pending.
    pub can_resolve: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub counters: DashboardCounters,
    pub cards: Vec<ComplaintCard>,
    /// Set when the filtered list is empty.
    pub placeholder: Option<String>,
}

pub fn apply_filters<'a>(
    list: &'a [ComplaintResponse],
    filters: &DashboardFilters,
) -> Vec<&'a ComplaintResponse> {
    list.iter()
        .filter(|c| filters.status.matches(c.status) && filters.category.matches(&c.category))
        .collect()
}

pub fn sort_newest_first(list: &mut [&ComplaintResponse]) {
    list.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
}

/// "Oct 19, 2026" for the public board; signed-in views add the time.
pub fn format_date(ts: DateTime<Utc>, audience: CardAudience) -> String {
    match audience {
        CardAudience::Public => ts.format("%b %-d, %Y").to_string(),
        CardAudience::Owner | CardAudience::Admin => ts.format("%b %-d, %Y %H:%M").to_string(),
    }
}

fn card(complaint: &ComplaintResponse, audience: CardAudience) -> ComplaintCard {
    let submitter = match audience {
        CardAudience::Public => None,
        CardAudience::Owner | CardAudience::Admin => {
            complaint.submitter.as_ref().map(|s| SubmitterLine {
                name: s.name.clone(),
                student_id: s.student_id.clone(),
            })
        }
    };
    ComplaintCard {
        id: complaint.id,
        category: complaint.category.clone(),
        category_label: category_label(&complaint.category),
        status: complaint.status,
        location: complaint.location.clone(),
        description: complaint.description.clone(),
        submitter,
        date_label: format_date(complaint.submitted_at, audience),
        urgency: complaint.urgency,
        high_urgency: complaint.urgency.is_high(),
        can_resolve: audience == CardAudience::Admin && complaint.is_pending(),
    }
}

/// Build the full dashboard view for one snapshot.
pub fn render(
    list: &[ComplaintResponse],
    filters: &DashboardFilters,
    audience: CardAudience,
) -> DashboardView {
    let counters = DashboardCounters::from_list(list);
    let mut visible = apply_filters(list, filters);
    sort_newest_first(&mut visible);

    let cards: Vec<ComplaintCard> = visible.into_iter().map(|c| card(c, audience)).collect();
    let placeholder = cards
        .is_empty()
        .then(|| audience.empty_message().to_string());

    DashboardView {
        counters,
        cards,
        placeholder,
    }
}
