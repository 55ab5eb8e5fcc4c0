use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

use super::service::deserialize_user_ids;
use super::tags;
use crate::error::BoardError;

/// The three board columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    New,
    Work,
    Done,
}

impl Column {
    /// Columns in board order.
    pub const ALL: [Self; 3] = [Self::New, Self::Work, Self::Done];

    pub(crate) const EXPECTED: &'static str = "column (new, work, done)";

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Work => "work",
            Self::Done => "done",
        }
    }

    /// Display label shown above the column.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "Backlog",
            Self::Work => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = BoardError;

    /// Accepts wire names and display labels, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "new" | "backlog" => Ok(Self::New),
            "work" | "in progress" | "doing" => Ok(Self::Work),
            "done" => Ok(Self::Done),
            _ => Err(BoardError::bad_column(s)),
        }
    }
}

/// Card priority. The board stores only the derived color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Card color used by the web board for this priority.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#61bd4f",
            Self::Medium => "#f2d600",
            Self::High => "#ff9f1a",
            Self::Critical => "#eb5a46",
        }
    }

    /// Recover the priority from a stored card color, if it is a known one.
    #[must_use]
    pub fn from_color(color: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.color().eq_ignore_ascii_case(color.trim()))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BoardError::InvalidEnumValue {
                expected: "priority (low, medium, high, critical)",
                got: s.to_string(),
            })
    }
}

/// A card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "tags::deserialize")]
    pub tags: Vec<String>,
    pub column: Column,
    #[serde(default)]
    pub color: Option<String>,
    /// Zero-based position within the column.
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: usize,
    #[serde(default, rename = "users", deserialize_with = "deserialize_user_ids")]
    pub assignees: Vec<String>,
}

impl Task {
    #[must_use]
    pub fn priority(&self) -> Option<Priority> {
        self.color.as_deref().and_then(Priority::from_color)
    }
}

/// Fields for a card that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTask {
    pub title: String,
    pub column: Option<Column>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub assignees: Vec<String>,
}

impl NewTask {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_parses_names_and_labels() {
        assert_eq!("new".parse::<Column>().unwrap(), Column::New);
        assert_eq!("Backlog".parse::<Column>().unwrap(), Column::New);
        assert_eq!("In Progress".parse::<Column>().unwrap(), Column::Work);
        assert_eq!("in-progress".parse::<Column>().unwrap(), Column::Work);
        assert_eq!("DONE".parse::<Column>().unwrap(), Column::Done);
        assert!("archived".parse::<Column>().is_err());
    }

    #[test]
    fn column_labels() {
        let labels: Vec<_> = Column::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, ["Backlog", "In Progress", "Done"]);
    }

    #[test]
    fn priority_color_lookup() {
        for p in Priority::ALL {
            assert_eq!(Priority::from_color(p.color()), Some(p));
        }
        assert_eq!(Priority::from_color("#EB5A46"), Some(Priority::Critical));
        assert_eq!(Priority::from_color("teal"), None);
    }

    #[test]
    fn task_deserializes_backend_shape() {
        let raw = r##"{
            "_id": "64f0",
            "title": "Wire login",
            "description": null,
            "tags": "auth, ui",
            "column": "work",
            "color": "#ff9f1a",
            "order": 2,
            "users": ["u1", {"_id": "u2", "name": "Ada"}]
        }"##;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.id, "64f0");
        assert_eq!(task.tags, vec!["auth", "ui"]);
        assert_eq!(task.column, Column::Work);
        assert_eq!(task.order, 2);
        assert_eq!(task.assignees, vec!["u1", "u2"]);
        assert_eq!(task.priority(), Some(Priority::High));
    }

    #[test]
    fn task_tolerates_missing_optional_fields() {
        let task: Task =
            serde_json::from_str(r#"{"id":"t","title":"x","column":"new","order":null}"#).unwrap();
        assert_eq!(task.order, 0);
        assert!(task.tags.is_empty());
        assert!(task.assignees.is_empty());
        assert!(task.color.is_none());
    }

    #[test]
    fn unknown_column_is_rejected() {
        let res = serde_json::from_str::<Task>(r#"{"id":"t","title":"x","column":"later"}"#);
        assert!(res.is_err());
    }
}
