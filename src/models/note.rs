//! Note and NoteBlock entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Note priority. Serialized lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Priority> {
        match s {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// Created/updated timestamps shared by every entity. `completed` is
/// meaningful only for notes; it is never stored unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// A single to-do item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub priority: Priority,
    pub head: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub metadata: Metadata,
    /// Owning block, used for DB relations only.
    #[serde(skip)]
    pub note_block_id: i64,
}

/// A titled list of notes within a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteBlock {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub head: String,
    #[serde(default)]
    pub metadata: Metadata,
    /// Child notes, populated only when explicitly requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<Note>>,
    /// Owning workspace, used for DB relations only.
    #[serde(skip)]
    pub workspace_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_round_trips_through_strings() {
        for p in [Priority::High, Priority::Medium, Priority::Low] {
            assert_eq!(Priority::from_str(p.as_str()), Some(p));
        }
        assert_eq!(Priority::from_str("urgent"), None);
    }

    #[test]
    fn priority_defaults_to_medium_when_missing() {
        let note: Note = serde_json::from_str(r#"{"head":"buy milk"}"#).unwrap();
        assert_eq!(note.priority, Priority::Medium);
        assert_eq!(note.note, "");
        assert!(note.metadata.created.is_none());
        assert!(note.metadata.completed.is_none());
    }

    #[test]
    fn note_serializes_camel_case() {
        let note = Note {
            id: 3,
            priority: Priority::High,
            head: "call bank".to_string(),
            note: "before noon".to_string(),
            metadata: Metadata {
                completed: Some(false),
                ..Default::default()
            },
            note_block_id: 9,
        };
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["priority"], "high");
        assert_eq!(value["metadata"]["completed"], false);
        // The owning block id never leaves the process.
        assert!(value.get("noteBlockId").is_none());
    }
}
