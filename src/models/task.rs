use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the priority of a task. Stored as lowercase text.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

/// A task entity as returned by the API, with tags decoded into an ordered
/// list of strings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: i64,
    /// The title of the task (1 to 255 characters).
    pub title: String,
    /// An optional description, at most 1000 characters.
    pub description: Option<String>,
    /// Whether the task has been completed.
    pub completed: bool,
    /// The priority of the task.
    pub priority: TaskPriority,
    /// Whether the task is starred.
    pub starred: bool,
    /// Ordered tags, at most 10.
    pub tags: Vec<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Identifier of the user who owns the task.
    pub owner_id: i64,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

/// A task row as stored in the database, with tags still JSON-encoded.
#[derive(Debug, FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: TaskPriority,
    pub starred: bool,
    pub tags: String,
    pub due_date: Option<DateTime<Utc>>,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            priority: row.priority,
            starred: row.starred,
            tags: decode_tags(&row.tags),
            due_date: row.due_date,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Encodes tags for storage as a JSON array string.
pub fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes a stored tags column back into an ordered list. A column that
/// fails to decode degrades to an empty list rather than an error.
pub fn decode_tags(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Parses a client-supplied due date (RFC 3339). An unparsable value yields
/// `None` and the field is silently dropped rather than rejected (documented
/// API quirk).
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Input structure for creating a task. Validation covers title and
/// description lengths and the tag count; the priority enum rejects unknown
/// values at deserialization time.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskCreate {
    /// The title of the task. Must be between 1 and 255 characters.
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// An optional description, at most 1000 characters.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Initial completion state. Defaults to false.
    #[serde(default)]
    pub completed: bool,

    /// Priority of the task. Defaults to medium when omitted.
    pub priority: Option<TaskPriority>,

    /// Star flag. Defaults to false.
    #[serde(default)]
    pub starred: bool,

    /// Ordered tags, at most 10 entries.
    #[validate(length(max = 10))]
    pub tags: Option<Vec<String>>,

    /// Optional due date as an RFC 3339 string. An unparsable value is
    /// silently dropped.
    pub due_date: Option<String>,
}

/// Partial update for a task. Only fields explicitly provided are applied;
/// absent fields are left untouched (explicit `null` counts as absent).
/// Provided tags replace the stored list wholesale.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub completed: Option<bool>,

    pub priority: Option<TaskPriority>,

    pub starred: Option<bool>,

    #[validate(length(max = 10))]
    pub tags: Option<Vec<String>>,

    /// Replacement due date as an RFC 3339 string. An unparsable value skips
    /// the update of this field.
    pub due_date: Option<String>,
}

/// Query parameters for listing tasks: an offset/limit slice over the
/// owner's tasks in insertion order.
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl TaskListQuery {
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(100)
    }
}
