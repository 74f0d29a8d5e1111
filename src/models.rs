use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    // high=3, medium=2, low=1
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_time::deserialize_opt"
    )]
    pub due_date: Option<DateTime<FixedOffset>>,
    pub priority: Priority,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_pattern_id: Option<String>,
    #[serde(default)]
    pub progress: u8, // 0..=100
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<FixedOffset>>,
}

/// Caller-facing input for creating a task. Id and timestamps are assigned by
/// the repository.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_time::deserialize_opt")]
    pub due_date: Option<DateTime<FixedOffset>>,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default = "default_status")]
    pub status: TaskStatus,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub parent_task_id: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_pattern_id: Option<String>,
    #[serde(default)]
    pub progress: u8,
}

fn default_priority() -> Priority {
    Priority::Medium
}

fn default_status() -> TaskStatus {
    TaskStatus::Todo
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            priority: default_priority(),
            status: default_status(),
            project_id: None,
            parent_task_id: None,
            is_recurring: false,
            recurring_pattern_id: None,
            progress: 0,
        }
    }
}

// Partial update with merge semantics.
//     outer None  -> field absent, keep prior value
//     Some(None)  -> explicit null, clear the field
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient_time::deserialize_nullable")]
    pub due_date: Option<Option<DateTime<FixedOffset>>>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub parent_task_id: Option<Option<String>>,
    #[serde(default)]
    pub is_recurring: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub recurring_pattern_id: Option<Option<String>>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default, deserialize_with = "lenient_time::deserialize_nullable")]
    pub completed_at: Option<Option<DateTime<FixedOffset>>>,
}

impl TaskPatch {
    /// Apply every present field onto `task`. Timestamps other than
    /// `completedAt` are left to the caller.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(v) = self.title {
            task.title = v;
        }
        if let Some(v) = self.description {
            task.description = v;
        }
        if let Some(v) = self.due_date {
            task.due_date = v;
        }
        if let Some(v) = self.priority {
            task.priority = v;
        }
        if let Some(v) = self.status {
            task.status = v;
        }
        if let Some(v) = self.project_id {
            task.project_id = v;
        }
        if let Some(v) = self.parent_task_id {
            task.parent_task_id = v;
        }
        if let Some(v) = self.is_recurring {
            task.is_recurring = v;
        }
        if let Some(v) = self.recurring_pattern_id {
            task.recurring_pattern_id = v;
        }
        if let Some(v) = self.progress {
            task.progress = v.min(100);
        }
        if let Some(v) = self.completed_at {
            task.completed_at = v;
        }
    }
}

// Present-but-null maps to Some(None); absence is handled by #[serde(default)].
fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String, // rich-text markup, never interpreted
    // kept as written so stored documents round-trip byte for byte
    pub created_at: String,
    pub updated_at: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

/// Durable window/UI preferences (`window-settings.json`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    pub width: u32,
    pub height: u32,
    pub is_always_on_top: bool,
    pub is_screen_share_private: bool,
    pub background_color: String,
    pub accent_color: String,
    pub opacity: f64,
    pub theme: Theme,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            width: 1000,
            height: 700,
            is_always_on_top: false,
            is_screen_share_private: false,
            background_color: "#ffffff".to_string(),
            accent_color: "#fbbf24".to_string(),
            opacity: 1.0,
            theme: Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_always_on_top: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_screen_share_private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl SettingsPatch {
    pub fn moved(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn resized(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Shallow merge: every present field overwrites, everything else is kept.
    pub fn merge_into(self, doc: &mut WindowSettings) {
        if let Some(v) = self.x {
            doc.x = Some(v);
        }
        if let Some(v) = self.y {
            doc.y = Some(v);
        }
        if let Some(v) = self.width {
            doc.width = v;
        }
        if let Some(v) = self.height {
            doc.height = v;
        }
        if let Some(v) = self.is_always_on_top {
            doc.is_always_on_top = v;
        }
        if let Some(v) = self.is_screen_share_private {
            doc.is_screen_share_private = v;
        }
        if let Some(v) = self.background_color {
            doc.background_color = v;
        }
        if let Some(v) = self.accent_color {
            doc.accent_color = v;
        }
        if let Some(v) = self.opacity {
            doc.opacity = v;
        }
        if let Some(v) = self.theme {
            doc.theme = v;
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    #[serde(deserialize_with = "lenient_time::deserialize_day")]
    pub start: NaiveDate,
    #[serde(deserialize_with = "lenient_time::deserialize_day")]
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Date,
    Name,
    Priority,
    Tag,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOptions {
    pub status: Vec<TaskStatus>,
    pub priority: Vec<Priority>,
    pub projects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
}

/// Timestamp parsing that tolerates what the UI shell actually sends:
/// RFC 3339, a naive `datetime-local` value, or a bare calendar day.
/// Naive values are read in the current local offset.
pub mod lenient_time {
    use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};
    use serde::{Deserialize, Deserializer, de::Error};

    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

    pub fn parse(raw: &str) -> Option<DateTime<FixedOffset>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt);
        }
        let naive = NAIVE_FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.fixed_offset())
    }

    /// Calendar day of `raw` in the local zone. A bare date is taken as is.
    pub fn parse_day(raw: &str) -> Option<NaiveDate> {
        day_in(raw, &Local)
    }

    pub(crate) fn day_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(day);
        }
        parse(raw).map(|dt| dt.with_timezone(tz).date_naive())
    }

    pub fn deserialize_opt<'de, D>(de: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(de)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {s}"))),
        }
    }

    pub fn deserialize_nullable<'de, D>(
        de: D,
    ) -> Result<Option<Option<DateTime<FixedOffset>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_opt(de).map(Some)
    }

    pub fn deserialize_day<'de, D>(de: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(de)?;
        parse_day(&s).ok_or_else(|| D::Error::custom(format!("invalid day: {s}")))
    }
}
