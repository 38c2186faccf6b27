//! SQLite-backed note store.
//!
//! Row-level SQL lives in connection-scoped helpers so composite workspace
//! operations and the import transaction can reuse it under a single lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, ToSql, params};

use super::{NoteStore, StoreError, StoreResult};
use crate::db::Database;
use crate::models::{Metadata, Note, Priority};

const NOTE_COLUMNS: &str =
    "id, priority, head, note, metadata_created, metadata_updated, metadata_completed, note_block_id";

/// Parse a stored RFC 3339 timestamp. Rows are only ever written by the
/// store, so a malformed value degrades to the epoch instead of panicking.
pub(crate) fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

pub(crate) fn insert(conn: &Connection, mut note: Note, note_block_id: i64) -> StoreResult<Note> {
    let now = Utc::now();
    let created = *note.metadata.created.get_or_insert(now);
    let updated = *note.metadata.updated.get_or_insert(now);
    let completed = *note.metadata.completed.get_or_insert(false);

    // id 0 means store-assigned; NULL lets SQLite pick the next rowid.
    let supplied_id: Option<i64> = (note.id != 0).then_some(note.id);

    conn.execute(
        "INSERT INTO notes (id, priority, head, note, metadata_created, metadata_updated, metadata_completed, note_block_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            supplied_id,
            note.priority.as_str(),
            note.head,
            note.note,
            created.to_rfc3339(),
            updated.to_rfc3339(),
            completed,
            note_block_id,
        ],
    )?;

    if note.id == 0 {
        note.id = conn.last_insert_rowid();
    }
    note.note_block_id = note_block_id;

    Ok(note)
}

pub(crate) fn get_by_id(conn: &Connection, id: i64) -> StoreResult<Note> {
    conn.query_row(
        &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
        [id],
        row_to_note,
    )
    .optional()?
    .ok_or(StoreError::NoteNotFound(id))
}

pub(crate) fn list_by_block(conn: &Connection, note_block_id: i64) -> StoreResult<Vec<Note>> {
    query_notes(
        conn,
        &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE note_block_id = ?1 ORDER BY id ASC"),
        &[&note_block_id as &dyn ToSql],
    )
}

pub(crate) fn update(conn: &Connection, mut note: Note) -> StoreResult<Note> {
    let now = Utc::now();
    note.metadata.updated = Some(now);
    let completed = *note.metadata.completed.get_or_insert(false);

    let affected = conn.execute(
        "UPDATE notes SET priority = ?1, head = ?2, note = ?3, metadata_updated = ?4, metadata_completed = ?5
         WHERE id = ?6",
        params![
            note.priority.as_str(),
            note.head,
            note.note,
            now.to_rfc3339(),
            completed,
            note.id,
        ],
    )?;

    if affected == 0 {
        return Err(StoreError::NoteNotFound(note.id));
    }

    Ok(note)
}

pub(crate) fn delete(conn: &Connection, id: i64) -> StoreResult<()> {
    let affected = conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
    if affected == 0 {
        return Err(StoreError::NoteNotFound(id));
    }
    Ok(())
}

pub(crate) fn toggle_completed(conn: &Connection, id: i64) -> StoreResult<()> {
    let affected = conn.execute(
        "UPDATE notes SET metadata_completed = NOT metadata_completed, metadata_updated = ?1
         WHERE id = ?2",
        params![Utc::now().to_rfc3339(), id],
    )?;

    if affected == 0 {
        return Err(StoreError::NoteNotFound(id));
    }
    Ok(())
}

fn query_notes(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> StoreResult<Vec<Note>> {
    let mut stmt = conn.prepare(sql)?;
    let notes = stmt
        .query_map(params, row_to_note)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(notes)
}

fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<Note> {
    let priority_str: String = row.get(1)?;
    let created_str: String = row.get(4)?;
    let updated_str: String = row.get(5)?;

    Ok(Note {
        id: row.get(0)?,
        priority: Priority::from_str(&priority_str).unwrap_or(Priority::Medium),
        head: row.get(2)?,
        note: row.get(3)?,
        metadata: Metadata {
            created: Some(parse_ts(&created_str)),
            updated: Some(parse_ts(&updated_str)),
            completed: Some(row.get(6)?),
        },
        note_block_id: row.get(7)?,
    })
}

/// Note store over a shared SQLite handle.
pub struct SqliteNoteStore {
    db: Arc<Database>,
}

impl SqliteNoteStore {
    pub fn new(db: Arc<Database>) -> Self {
        SqliteNoteStore { db }
    }
}

impl NoteStore for SqliteNoteStore {
    fn create(&self, note: Note, note_block_id: i64) -> StoreResult<Note> {
        let conn = self.db.conn.lock().unwrap();
        insert(&conn, note, note_block_id)
    }

    fn get_by_id(&self, id: i64) -> StoreResult<Note> {
        let conn = self.db.conn.lock().unwrap();
        get_by_id(&conn, id)
    }

    fn list_by_block(&self, note_block_id: i64) -> StoreResult<Vec<Note>> {
        let conn = self.db.conn.lock().unwrap();
        list_by_block(&conn, note_block_id)
    }

    fn update(&self, note: Note) -> StoreResult<Note> {
        let conn = self.db.conn.lock().unwrap();
        update(&conn, note)
    }

    fn delete(&self, id: i64) -> StoreResult<()> {
        let conn = self.db.conn.lock().unwrap();
        delete(&conn, id)
    }

    fn toggle_completed(&self, id: i64) -> StoreResult<()> {
        let conn = self.db.conn.lock().unwrap();
        toggle_completed(&conn, id)
    }

    fn list_by_priority(&self, note_block_id: i64, priority: Priority) -> StoreResult<Vec<Note>> {
        let conn = self.db.conn.lock().unwrap();
        query_notes(
            &conn,
            &format!(
                "SELECT {NOTE_COLUMNS} FROM notes WHERE note_block_id = ?1 AND priority = ?2 ORDER BY id ASC"
            ),
            &[&note_block_id as &dyn ToSql, &priority.as_str()],
        )
    }

    fn list_completed(&self, note_block_id: i64) -> StoreResult<Vec<Note>> {
        let conn = self.db.conn.lock().unwrap();
        query_notes(
            &conn,
            &format!(
                "SELECT {NOTE_COLUMNS} FROM notes WHERE note_block_id = ?1 AND metadata_completed = 1 ORDER BY id ASC"
            ),
            &[&note_block_id as &dyn ToSql],
        )
    }

    fn list_pending(&self, note_block_id: i64) -> StoreResult<Vec<Note>> {
        let conn = self.db.conn.lock().unwrap();
        query_notes(
            &conn,
            &format!(
                "SELECT {NOTE_COLUMNS} FROM notes WHERE note_block_id = ?1 AND metadata_completed = 0 ORDER BY id ASC"
            ),
            &[&note_block_id as &dyn ToSql],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{note, seeded_stores};

    #[test]
    fn create_defaults_timestamps_and_completed() {
        let (stores, block_id) = seeded_stores();

        let created = stores.note.create(note("buy milk", Priority::Medium), block_id).unwrap();

        assert!(created.id > 0);
        assert_eq!(created.metadata.completed, Some(false));
        assert_eq!(created.metadata.created, created.metadata.updated);
    }

    #[test]
    fn create_adopts_supplied_nonzero_id() {
        let (stores, block_id) = seeded_stores();

        let mut n = note("imported", Priority::Low);
        n.id = 42;
        let created = stores.note.create(n, block_id).unwrap();
        assert_eq!(created.id, 42);

        let fetched = stores.note.get_by_id(42).unwrap();
        assert_eq!(fetched.head, "imported");
    }

    #[test]
    fn create_fails_for_missing_parent_block() {
        let (stores, _) = seeded_stores();

        let err = stores.note.create(note("orphan", Priority::High), 9999).unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn update_bumps_updated_and_rejects_unknown_id() {
        let (stores, block_id) = seeded_stores();

        let created = stores.note.create(note("draft", Priority::Medium), block_id).unwrap();
        let before = created.metadata.updated.unwrap();

        let updated = stores.note.update(created.clone()).unwrap();
        assert!(updated.metadata.updated.unwrap() >= before);

        let mut ghost = note("ghost", Priority::Low);
        ghost.id = 555;
        let err = stores.note.update(ghost).unwrap_err();
        assert!(matches!(err, StoreError::NoteNotFound(555)));
    }

    #[test]
    fn toggle_completed_is_an_involution() {
        let (stores, block_id) = seeded_stores();

        let created = stores.note.create(note("task", Priority::High), block_id).unwrap();
        assert_eq!(created.metadata.completed, Some(false));

        stores.note.toggle_completed(created.id).unwrap();
        assert_eq!(
            stores.note.get_by_id(created.id).unwrap().metadata.completed,
            Some(true)
        );

        stores.note.toggle_completed(created.id).unwrap();
        assert_eq!(
            stores.note.get_by_id(created.id).unwrap().metadata.completed,
            Some(false)
        );
    }

    #[test]
    fn toggle_and_delete_report_not_found() {
        let (stores, _) = seeded_stores();

        assert!(matches!(
            stores.note.toggle_completed(404).unwrap_err(),
            StoreError::NoteNotFound(404)
        ));
        assert!(matches!(
            stores.note.delete(404).unwrap_err(),
            StoreError::NoteNotFound(404)
        ));
    }

    #[test]
    fn filters_are_scoped_and_ordered() {
        let (stores, block_id) = seeded_stores();

        let high = stores.note.create(note("urgent", Priority::High), block_id).unwrap();
        let low = stores.note.create(note("later", Priority::Low), block_id).unwrap();
        stores.note.toggle_completed(low.id).unwrap();

        let by_priority = stores.note.list_by_priority(block_id, Priority::High).unwrap();
        assert_eq!(by_priority.len(), 1);
        assert_eq!(by_priority[0].id, high.id);

        let completed = stores.note.list_completed(block_id).unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, low.id);

        let pending = stores.note.list_pending(block_id).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, high.id);

        let all = stores.note.list_by_block(block_id).unwrap();
        assert_eq!(all.iter().map(|n| n.id).collect::<Vec<_>>(), vec![high.id, low.id]);
    }

    #[test]
    fn empty_filters_return_empty_not_error() {
        let (stores, block_id) = seeded_stores();

        assert!(stores.note.list_by_block(block_id).unwrap().is_empty());
        assert!(stores.note.list_completed(block_id).unwrap().is_empty());
        assert!(
            stores
                .note
                .list_by_priority(block_id, Priority::High)
                .unwrap()
                .is_empty()
        );
    }
}
