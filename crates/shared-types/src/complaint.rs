use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppError;

/// Valid complaint categories, in the order the submit form lists them.
pub const COMPLAINT_CATEGORIES: &[&str] = &[
    "academic",
    "hostel",
    "infrastructure",
    "canteen",
    "transport",
    "library",
    "it_services",
    "other",
];

pub fn is_valid_category(s: &str) -> bool {
    COMPLAINT_CATEGORIES.contains(&s)
}

/// Human label for a category slug ("it_services" -> "IT Services").
pub fn category_label(slug: &str) -> String {
    match slug {
        "it_services" => "IT Services".to_string(),
        other => other
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" "),
    }
}

// ---------------------------------------------------------------------------
// Urgency & Status
// ---------------------------------------------------------------------------

/// Ordinal severity of a complaint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub const ALL: [Urgency; 4] = [Urgency::Low, Urgency::Medium, Urgency::High, Urgency::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
            Urgency::Critical => "Critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Urgency::Low),
            "medium" => Some(Urgency::Medium),
            "high" => Some(Urgency::High),
            "critical" => Some(Urgency::Critical),
            _ => None,
        }
    }

    /// High and critical share the same visual flag.
    pub fn is_high(&self) -> bool {
        *self >= Urgency::High
    }
}

/// Lifecycle of a complaint. Pending -> Resolved is the only transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    Resolved,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::Resolved => "resolved",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "Pending",
            ComplaintStatus::Resolved => "Resolved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ComplaintStatus::Pending),
            "resolved" => Some(ComplaintStatus::Resolved),
            _ => None,
        }
    }

    /// Validate a status change. Resolution is one-way; there is no reopen.
    pub fn transition_to(self, next: ComplaintStatus) -> Result<ComplaintStatus, AppError> {
        match (self, next) {
            (ComplaintStatus::Pending, ComplaintStatus::Resolved) => Ok(next),
            (ComplaintStatus::Resolved, ComplaintStatus::Resolved) => {
                Err(AppError::conflict("Complaint is already resolved"))
            }
            (_, ComplaintStatus::Pending) => {
                Err(AppError::bad_request("A complaint cannot be moved back to pending"))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Domain Struct
// ---------------------------------------------------------------------------

/// A complaint row as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Complaint {
    pub id: Uuid,
    pub category: String,
    pub location: String,
    pub description: String,
    pub urgency: String,
    pub status: String,
    pub user_id: i64,
    pub student_name: String,
    pub student_id: String,
    pub student_email: String,
    pub submitted_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<i64>,
}

// ---------------------------------------------------------------------------
// Request/Response DTOs
// ---------------------------------------------------------------------------

/// Who filed a complaint. Omitted from the public listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Submitter {
    pub user_id: i64,
    pub name: String,
    pub student_id: String,
    pub email: String,
}

/// API response for a complaint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ComplaintResponse {
    pub id: Uuid,
    pub category: String,
    pub location: String,
    pub description: String,
    pub urgency: Urgency,
    pub status: ComplaintStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter: Option<Submitter>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<i64>,
}

impl ComplaintResponse {
    /// Strip everything that identifies the submitter or resolver.
    pub fn redacted(mut self) -> Self {
        self.submitter = None;
        self.resolved_by = None;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == ComplaintStatus::Pending
    }
}

impl From<Complaint> for ComplaintResponse {
    fn from(c: Complaint) -> Self {
        Self {
            id: c.id,
            urgency: Urgency::parse(&c.urgency).unwrap_or_default(),
            status: ComplaintStatus::parse(&c.status).unwrap_or_default(),
            submitter: Some(Submitter {
                user_id: c.user_id,
                name: c.student_name,
                student_id: c.student_id,
                email: c.student_email,
            }),
            category: c.category,
            location: c.location,
            description: c.description,
            submitted_at: c.submitted_at,
            resolved_at: c.resolved_at,
            resolved_by: c.resolved_by,
        }
    }
}

/// Request body for filing a complaint. Submitter details come from the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct SubmitComplaintRequest {
    pub category: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 200, message = "Location is required"))
    )]
    pub location: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 4000, message = "Please describe the problem"))
    )]
    pub description: String,
    pub urgency: Urgency,
}

impl SubmitComplaintRequest {
    /// Checks that need no server round trip. Runs on both sides.
    pub fn precheck(&self) -> Result<(), AppError> {
        if !is_valid_category(&self.category) {
            return Err(AppError::field("category", "Please choose a category"));
        }
        if self.location.trim().is_empty() {
            return Err(AppError::field("location", "Location is required"));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::field("description", "Please describe the problem"));
        }
        Ok(())
    }
}

/// Which complaints a live feed carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum FeedScope {
    /// The caller's own complaints.
    Mine,
    /// Every complaint; administrators only.
    All,
}

impl FeedScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedScope::Mine => "mine",
            FeedScope::All => "all",
        }
    }
}

/// Result of one feed long-poll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedUpdate {
    /// Complete current list, newest first. Replaces whatever the client holds.
    Snapshot {
        revision: u64,
        complaints: Vec<ComplaintResponse>,
    },
    /// Nothing changed before the wait timed out.
    Unchanged { revision: u64 },
    /// A newer subscription for the same feed took over, or the session ended.
    Superseded,
}

/// Count of registered user records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserCount {
    pub total: i64,
}
