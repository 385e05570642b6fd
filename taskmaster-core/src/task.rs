//! Task domain model
//!
//! Pure domain logic for task management with no I/O operations.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Newtype wrapper for task identifiers
///
/// Identifiers are opaque unique strings; fresh ones are UUID v4.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Generate a fresh unique identifier
    pub fn generate() -> Self {
        TaskId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        TaskId(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        TaskId(id.to_string())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task priority
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    // legacy data files spell the middle tier "avg"
    #[serde(alias = "avg")]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Task status
///
/// The usual path is `Pending -> InProgress -> Done`. `Done -> InProgress`
/// is the one reverse transition (reopening), and `Pending -> Done` is
/// reachable through the mark-complete quick action. None of this is
/// enforced: wholesale replacement may set any status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    #[serde(alias = "in the making")]
    InProgress,
    Done,
}

impl Status {
    pub fn is_done(self) -> bool {
        self == Status::Done
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pending => write!(f, "pending"),
            Status::InProgress => write!(f, "in progress"),
            Status::Done => write!(f, "done"),
        }
    }
}

/// A geographic location attached to a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, address: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            address: address.into(),
        }
    }
}

/// A single task
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "due_date_serde")]
    pub due_date: DateTime<Local>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reminder_set: bool,
}

impl Task {
    /// Add a tag to this task (duplicates by simple equality are skipped)
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim_start_matches('#').to_string();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Remove a tag from this task
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim_start_matches('#');
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Mark-complete quick action (reachable from any status)
    pub fn mark_complete(&mut self) {
        self.status = Status::Done;
    }

    /// Move a task into progress
    pub fn start(&mut self) {
        self.status = Status::InProgress;
    }

    /// Reopen a finished task back into progress
    pub fn reopen(&mut self) {
        self.status = Status::InProgress;
    }

    /// Check if the task is past due and not finished
    pub fn is_overdue(&self) -> bool {
        self.due_date < Local::now() && !self.status.is_done()
    }
}

/// A task as it exists before the store assigns it an identifier
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Local>,
    pub priority: Priority,
    pub status: Status,
    pub location: Option<Location>,
    pub tags: Vec<String>,
    pub reminder_set: bool,
}

impl TaskDraft {
    /// Create a new draft with the given title and due date
    pub fn new(title: impl Into<String>, due_date: DateTime<Local>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date,
            priority: Priority::default(),
            status: Status::default(),
            location: None,
            tags: Vec::new(),
            reminder_set: false,
        }
    }

    /// Builder method to set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder method to set the status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Builder method to attach a location
    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    /// Builder method to set tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Builder method to set the reminder flag
    pub fn with_reminder(mut self, reminder_set: bool) -> Self {
        self.reminder_set = reminder_set;
        self
    }

    /// Turn the draft into a task under the given identifier
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            priority: self.priority,
            status: self.status,
            location: self.location,
            tags: self.tags,
            reminder_set: self.reminder_set,
        }
    }
}

/// Serialization for the due-date field.
///
/// Writes RFC 3339; reads accept RFC 3339 or the date-like string shapes
/// older data files carried, normalizing all of them to a concrete local
/// date-time.
pub mod due_date_serde {
    use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_due_string(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("unrecognized due date value '{}'", raw))
        })
    }

    fn parse_due_string(raw: &str) -> Option<DateTime<Local>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Local));
        }

        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Local.from_local_datetime(&dt).single();
            }
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|dt| Local.from_local_datetime(&dt).single())
    }
}
