//! SQLite-backed note block store.

use std::sync::Arc;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use super::notes::parse_ts;
use super::{NoteBlockStore, StoreError, StoreResult, notes};
use crate::db::Database;
use crate::models::{Metadata, NoteBlock};

const BLOCK_COLUMNS: &str = "id, head, metadata_created, metadata_updated, workspace_id";

/// Insert a block and, when supplied inline, its notes.
pub(crate) fn insert(
    conn: &Connection,
    mut block: NoteBlock,
    workspace_id: &str,
) -> StoreResult<NoteBlock> {
    let now = Utc::now();
    let created = *block.metadata.created.get_or_insert(now);
    let updated = *block.metadata.updated.get_or_insert(now);

    let supplied_id: Option<i64> = (block.id != 0).then_some(block.id);

    conn.execute(
        "INSERT INTO note_blocks (id, head, metadata_created, metadata_updated, workspace_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            supplied_id,
            block.head,
            created.to_rfc3339(),
            updated.to_rfc3339(),
            workspace_id,
        ],
    )?;

    if block.id == 0 {
        block.id = conn.last_insert_rowid();
    }
    block.workspace_id = workspace_id.to_string();

    if let Some(inline_notes) = block.notes.take() {
        let mut persisted = Vec::with_capacity(inline_notes.len());
        for note in inline_notes {
            persisted.push(notes::insert(conn, note, block.id)?);
        }
        block.notes = Some(persisted);
    }

    Ok(block)
}

pub(crate) fn get_by_id(conn: &Connection, id: i64) -> StoreResult<NoteBlock> {
    conn.query_row(
        &format!("SELECT {BLOCK_COLUMNS} FROM note_blocks WHERE id = ?1"),
        [id],
        row_to_block,
    )
    .optional()?
    .ok_or(StoreError::NoteBlockNotFound(id))
}

pub(crate) fn list_by_workspace(conn: &Connection, workspace_id: &str) -> StoreResult<Vec<NoteBlock>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BLOCK_COLUMNS} FROM note_blocks WHERE workspace_id = ?1 ORDER BY id ASC"
    ))?;
    let blocks = stmt
        .query_map([workspace_id], row_to_block)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(blocks)
}

pub(crate) fn update(conn: &Connection, mut block: NoteBlock) -> StoreResult<NoteBlock> {
    let now = Utc::now();
    block.metadata.updated = Some(now);

    let affected = conn.execute(
        "UPDATE note_blocks SET head = ?1, metadata_updated = ?2 WHERE id = ?3",
        params![block.head, now.to_rfc3339(), block.id],
    )?;

    if affected == 0 {
        return Err(StoreError::NoteBlockNotFound(block.id));
    }

    Ok(block)
}

pub(crate) fn delete(conn: &Connection, id: i64) -> StoreResult<()> {
    // Child notes go with the block via the FK cascade.
    let affected = conn.execute("DELETE FROM note_blocks WHERE id = ?1", [id])?;
    if affected == 0 {
        return Err(StoreError::NoteBlockNotFound(id));
    }
    Ok(())
}

pub(crate) fn get_with_notes(conn: &Connection, id: i64) -> StoreResult<NoteBlock> {
    let mut block = get_by_id(conn, id)?;
    block.notes = Some(notes::list_by_block(conn, id)?);
    Ok(block)
}

fn row_to_block(row: &rusqlite::Row) -> rusqlite::Result<NoteBlock> {
    let created_str: String = row.get(2)?;
    let updated_str: String = row.get(3)?;

    Ok(NoteBlock {
        id: row.get(0)?,
        head: row.get(1)?,
        metadata: Metadata {
            created: Some(parse_ts(&created_str)),
            updated: Some(parse_ts(&updated_str)),
            completed: None,
        },
        notes: None,
        workspace_id: row.get(4)?,
    })
}

/// Note block store over a shared SQLite handle.
pub struct SqliteNoteBlockStore {
    db: Arc<Database>,
}

impl SqliteNoteBlockStore {
    pub fn new(db: Arc<Database>) -> Self {
        SqliteNoteBlockStore { db }
    }
}

impl NoteBlockStore for SqliteNoteBlockStore {
    fn create(&self, block: NoteBlock, workspace_id: &str) -> StoreResult<NoteBlock> {
        let conn = self.db.conn.lock().unwrap();
        insert(&conn, block, workspace_id)
    }

    fn get_by_id(&self, id: i64) -> StoreResult<NoteBlock> {
        let conn = self.db.conn.lock().unwrap();
        get_by_id(&conn, id)
    }

    fn list_by_workspace(&self, workspace_id: &str) -> StoreResult<Vec<NoteBlock>> {
        let conn = self.db.conn.lock().unwrap();
        list_by_workspace(&conn, workspace_id)
    }

    fn update(&self, block: NoteBlock) -> StoreResult<NoteBlock> {
        let conn = self.db.conn.lock().unwrap();
        update(&conn, block)
    }

    fn delete(&self, id: i64) -> StoreResult<()> {
        let conn = self.db.conn.lock().unwrap();
        delete(&conn, id)
    }

    fn get_with_notes(&self, id: i64) -> StoreResult<NoteBlock> {
        let conn = self.db.conn.lock().unwrap();
        get_with_notes(&conn, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::store::test_support::{block, note, seeded_stores, workspace};

    #[test]
    fn create_defaults_timestamps_and_generates_id() {
        let (stores, _) = seeded_stores();

        let created = stores.note_block.create(block("Errands"), "w1").unwrap();
        assert!(created.id > 0);
        assert_eq!(created.metadata.created, created.metadata.updated);
        assert_eq!(created.workspace_id, "w1");
    }

    #[test]
    fn create_fails_for_missing_workspace() {
        let (stores, _) = seeded_stores();

        let err = stores.note_block.create(block("Nowhere"), "ghost").unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn list_by_workspace_is_scoped_and_ordered() {
        let (stores, first_id) = seeded_stores();
        stores.workspace.create(workspace("w2", "Other")).unwrap();

        let second = stores.note_block.create(block("Second"), "w1").unwrap();
        stores.note_block.create(block("Elsewhere"), "w2").unwrap();

        let blocks = stores.note_block.list_by_workspace("w1").unwrap();
        assert_eq!(
            blocks.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![first_id, second.id]
        );
    }

    #[test]
    fn update_and_delete_report_not_found() {
        let (stores, _) = seeded_stores();

        let mut ghost = block("ghost");
        ghost.id = 777;
        assert!(matches!(
            stores.note_block.update(ghost).unwrap_err(),
            StoreError::NoteBlockNotFound(777)
        ));
        assert!(matches!(
            stores.note_block.delete(777).unwrap_err(),
            StoreError::NoteBlockNotFound(777)
        ));
    }

    #[test]
    fn delete_cascades_to_notes() {
        let (stores, block_id) = seeded_stores();

        let n = stores.note.create(note("doomed", Priority::Medium), block_id).unwrap();
        stores.note_block.delete(block_id).unwrap();

        assert!(matches!(
            stores.note.get_by_id(n.id).unwrap_err(),
            StoreError::NoteNotFound(_)
        ));
    }

    #[test]
    fn get_with_notes_attaches_children_or_empty_vec() {
        let (stores, block_id) = seeded_stores();

        let empty = stores.note_block.get_with_notes(block_id).unwrap();
        assert_eq!(empty.notes, Some(vec![]));

        let n = stores.note.create(note("child", Priority::Low), block_id).unwrap();
        let with_notes = stores.note_block.get_with_notes(block_id).unwrap();
        assert_eq!(with_notes.notes.unwrap(), vec![n]);
    }
}
