//! SQLite-backed workspace store.
//!
//! Composes the note block and note helpers for hierarchy assembly and owns
//! the transactional bulk import and the full-hierarchy export.

use std::sync::Arc;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use super::notes::parse_ts;
use super::{StoreError, StoreResult, WorkspaceStore, note_blocks, notes};
use crate::db::Database;
use crate::models::workspace::EXPORT_VERSION;
use crate::models::{ExportData, Metadata, Workspace};

/// App-config title applied when the caller supplies none.
const DEFAULT_APP_TITLE: &str = "Simple Todo App";

const WORKSPACE_COLUMNS: &str =
    "id, name, created, last_modified, app_config_title, app_config_created, app_config_updated";

/// Insert a workspace row plus any inline note blocks (and their notes).
pub(crate) fn insert(conn: &Connection, mut workspace: Workspace) -> StoreResult<Workspace> {
    let now = Utc::now();
    workspace.created = Some(now);
    workspace.last_modified = Some(now);

    if workspace.id.is_empty() {
        workspace.id = format!("workspace_{}", Uuid::new_v4());
    }

    if workspace.data.app_config.title.is_empty() {
        workspace.data.app_config.title = DEFAULT_APP_TITLE.to_string();
        workspace.data.app_config.metadata.created = Some(now);
        workspace.data.app_config.metadata.updated = Some(now);
    }

    conn.execute(
        "INSERT INTO workspaces (id, name, created, last_modified, app_config_title, app_config_created, app_config_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            workspace.id,
            workspace.name,
            now.to_rfc3339(),
            now.to_rfc3339(),
            workspace.data.app_config.title,
            workspace.data.app_config.metadata.created.map(|t| t.to_rfc3339()),
            workspace.data.app_config.metadata.updated.map(|t| t.to_rfc3339()),
        ],
    )?;

    let inline_blocks = std::mem::take(&mut workspace.data.note_blocks);
    let mut persisted = Vec::with_capacity(inline_blocks.len());
    for block in inline_blocks {
        persisted.push(note_blocks::insert(conn, block, &workspace.id)?);
    }
    workspace.data.note_blocks = persisted;

    Ok(workspace)
}

pub(crate) fn get_by_id(conn: &Connection, id: &str) -> StoreResult<Workspace> {
    conn.query_row(
        &format!("SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE id = ?1"),
        [id],
        row_to_workspace,
    )
    .optional()?
    .ok_or_else(|| StoreError::WorkspaceNotFound(id.to_string()))
}

pub(crate) fn list_all(conn: &Connection) -> StoreResult<Vec<Workspace>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {WORKSPACE_COLUMNS} FROM workspaces ORDER BY created ASC"
    ))?;
    let workspaces = stmt
        .query_map([], row_to_workspace)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(workspaces)
}

pub(crate) fn update(conn: &Connection, mut workspace: Workspace) -> StoreResult<Workspace> {
    let now = Utc::now();
    workspace.last_modified = Some(now);
    workspace.data.app_config.metadata.updated = Some(now);

    let affected = conn.execute(
        "UPDATE workspaces SET name = ?1, last_modified = ?2, app_config_title = ?3, app_config_updated = ?4
         WHERE id = ?5",
        params![
            workspace.name,
            now.to_rfc3339(),
            workspace.data.app_config.title,
            now.to_rfc3339(),
            workspace.id,
        ],
    )?;

    if affected == 0 {
        return Err(StoreError::WorkspaceNotFound(workspace.id));
    }

    Ok(workspace)
}

pub(crate) fn delete(conn: &Connection, id: &str) -> StoreResult<()> {
    // Blocks and notes go with the workspace via the FK cascades.
    let affected = conn.execute("DELETE FROM workspaces WHERE id = ?1", [id])?;
    if affected == 0 {
        return Err(StoreError::WorkspaceNotFound(id.to_string()));
    }
    Ok(())
}

/// The canonical deep read: workspace, its blocks, each block's notes.
pub(crate) fn full_hierarchy(conn: &Connection, id: &str) -> StoreResult<Workspace> {
    let mut workspace = get_by_id(conn, id)?;

    let mut blocks = note_blocks::list_by_workspace(conn, id)?;
    for block in &mut blocks {
        block.notes = Some(notes::list_by_block(conn, block.id)?);
    }

    workspace.data.note_blocks = blocks;
    Ok(workspace)
}

fn row_to_workspace(row: &rusqlite::Row) -> rusqlite::Result<Workspace> {
    let created_str: String = row.get(2)?;
    let last_modified_str: String = row.get(3)?;
    let app_created_str: Option<String> = row.get(5)?;
    let app_updated_str: Option<String> = row.get(6)?;

    let mut workspace = Workspace {
        id: row.get(0)?,
        name: row.get(1)?,
        created: Some(parse_ts(&created_str)),
        last_modified: Some(parse_ts(&last_modified_str)),
        ..Default::default()
    };

    workspace.data.app_config.title = row.get(4)?;
    workspace.data.app_config.metadata = Metadata {
        created: app_created_str.map(|s| parse_ts(&s)),
        updated: app_updated_str.map(|s| parse_ts(&s)),
        completed: None,
    };

    Ok(workspace)
}

/// Workspace store over a shared SQLite handle.
pub struct SqliteWorkspaceStore {
    db: Arc<Database>,
}

impl SqliteWorkspaceStore {
    pub fn new(db: Arc<Database>) -> Self {
        SqliteWorkspaceStore { db }
    }
}

impl WorkspaceStore for SqliteWorkspaceStore {
    fn create(&self, workspace: Workspace) -> StoreResult<Workspace> {
        let conn = self.db.conn.lock().unwrap();
        insert(&conn, workspace)
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Workspace> {
        let conn = self.db.conn.lock().unwrap();
        get_by_id(&conn, id)
    }

    fn list_all(&self) -> StoreResult<Vec<Workspace>> {
        let conn = self.db.conn.lock().unwrap();
        list_all(&conn)
    }

    fn update(&self, workspace: Workspace) -> StoreResult<Workspace> {
        let conn = self.db.conn.lock().unwrap();
        update(&conn, workspace)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let conn = self.db.conn.lock().unwrap();
        delete(&conn, id)
    }

    fn get_with_full_hierarchy(&self, id: &str) -> StoreResult<Workspace> {
        let conn = self.db.conn.lock().unwrap();
        full_hierarchy(&conn, id)
    }

    fn import_workspaces(&self, workspaces: Vec<Workspace>) -> StoreResult<Vec<Workspace>> {
        let conn = self.db.conn.lock().unwrap();
        let tx = conn.unchecked_transaction()?;

        let mut imported = Vec::with_capacity(workspaces.len());
        for workspace in workspaces {
            let id = workspace.id.clone();
            match insert(&tx, workspace) {
                Ok(created) => imported.push(created),
                // Dropping the uncommitted transaction rolls back the batch.
                Err(source) => {
                    return Err(StoreError::Import {
                        id,
                        source: Box::new(source),
                    });
                }
            }
        }

        tx.commit()?;
        Ok(imported)
    }

    fn export_all(&self) -> StoreResult<ExportData> {
        let conn = self.db.conn.lock().unwrap();

        let mut workspaces = Vec::new();
        for workspace in list_all(&conn)? {
            workspaces.push(full_hierarchy(&conn, &workspace.id)?);
        }

        Ok(ExportData {
            export_date: Utc::now(),
            version: EXPORT_VERSION.to_string(),
            workspaces,
        })
    }
}
