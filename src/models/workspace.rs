//! Workspace entity and the bulk import/export envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::note::{Metadata, NoteBlock};

/// Export format version written into every export envelope.
pub const EXPORT_VERSION: &str = "1.0";

/// Per-workspace app configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub title: String,
    pub metadata: Metadata,
}

/// Data section of a workspace: its note blocks plus app configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppData {
    pub note_blocks: Vec<NoteBlock>,
    pub app_config: AppConfig,
}

/// Top-level container for note blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Caller-supplied string id; generated when left empty on create.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: AppData,
}

/// Complete export envelope: every workspace with its full hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub export_date: DateTime<Utc>,
    pub version: String,
    pub workspaces: Vec<Workspace>,
}

/// Import request body. Only the workspace list is consulted, so a previous
/// export document can be posted back as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_serializes_camel_case() {
        let ws = Workspace {
            id: "w1".to_string(),
            name: "Home".to_string(),
            created: Some(Utc::now()),
            last_modified: Some(Utc::now()),
            data: AppData::default(),
        };
        let value = serde_json::to_value(&ws).unwrap();
        assert!(value.get("lastModified").is_some());
        assert!(value["data"].get("noteBlocks").is_some());
        assert!(value["data"].get("appConfig").is_some());
    }

    #[test]
    fn import_request_accepts_export_envelope() {
        let body = r#"{
            "exportDate": "2024-01-01T00:00:00Z",
            "version": "1.0",
            "workspaces": [{"id": "w1", "name": "Home"}]
        }"#;
        let req: ImportRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.workspaces.len(), 1);
        assert_eq!(req.workspaces[0].id, "w1");
    }
}
