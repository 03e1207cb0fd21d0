use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::content::ContentRecord;
use crate::error::SiteError;

/// Admin-editable content tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminTable {
    HeroContent,
    AboutContent,
    Services,
    Testimonials,
    TeamMembers,
    JobListings,
}

impl AdminTable {
    pub const ALL: [AdminTable; 6] = [
        AdminTable::HeroContent,
        AdminTable::AboutContent,
        AdminTable::Services,
        AdminTable::Testimonials,
        AdminTable::TeamMembers,
        AdminTable::JobListings,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            AdminTable::HeroContent => "hero_content",
            AdminTable::AboutContent => "about_content",
            AdminTable::Services => "services",
            AdminTable::Testimonials => "testimonials",
            AdminTable::TeamMembers => "team_members",
            AdminTable::JobListings => "job_listings",
        }
    }

    /// Name the visibility flag is published under.
    pub fn visibility_column(&self) -> &'static str {
        match self {
            AdminTable::JobListings => "is_published",
            _ => "is_active",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.table_name() == name)
    }
}

impl fmt::Display for AdminTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

impl FromStr for AdminTable {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| SiteError::NotFound(format!("content table {}", s)))
    }
}

/// One row of an admin content table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRow {
    pub id: String,
    pub fields: Map<String, Value>,
    pub display_order: i64,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentRow {
    /// Public record: the free-form fields plus `id`, `display_order` and
    /// the table's visibility flag.
    pub fn to_record(&self, table: AdminTable) -> ContentRecord {
        let mut record = ContentRecord::from(self.fields.clone());
        record.insert("id", self.id.clone());
        record.insert("display_order", self.display_order);
        record.insert(table.visibility_column(), self.visible);
        record
    }
}

/// Admin form payload for a save. An absent or blank `id` means insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRowInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "default_visible", alias = "is_active", alias = "is_published")]
    pub visible: bool,
}

impl Default for ContentRowInput {
    fn default() -> Self {
        Self {
            id: None,
            fields: Map::new(),
            display_order: 0,
            visible: true,
        }
    }
}

impl ContentRowInput {
    /// Trimmed id when one was supplied.
    pub fn existing_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Booking,
    Enquiry,
    Application,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Booking => "booking",
            SubmissionKind::Enquiry => "enquiry",
            SubmissionKind::Application => "application",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmissionKind::Booking => "Booking request",
            SubmissionKind::Enquiry => "Contact enquiry",
            SubmissionKind::Application => "Job application",
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubmissionKind {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booking" => Ok(SubmissionKind::Booking),
            "enquiry" => Ok(SubmissionKind::Enquiry),
            "application" => Ok(SubmissionKind::Application),
            other => Err(SiteError::ValidationError(format!(
                "Unknown submission kind: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    New,
    Reviewed,
    Contacted,
    Closed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::New => "new",
            SubmissionStatus::Reviewed => "reviewed",
            SubmissionStatus::Contacted => "contacted",
            SubmissionStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(SubmissionStatus::New),
            "reviewed" => Ok(SubmissionStatus::Reviewed),
            "contacted" => Ok(SubmissionStatus::Contacted),
            "closed" => Ok(SubmissionStatus::Closed),
            other => Err(SiteError::ValidationError(format!(
                "Unknown submission status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub kind: SubmissionKind,
    pub payload: Value,
    pub status: SubmissionStatus,
    pub job_listing_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
