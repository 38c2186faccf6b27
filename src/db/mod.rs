//! SQLite database handle and schema setup.

use rusqlite::{Connection, Result as SqliteResult};
use std::sync::Mutex;

/// Shared database handle. One connection behind a mutex, safe for use
/// from concurrent request handlers.
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at `db_path` and ensure the schema exists.
    pub fn new(db_path: &str) -> SqliteResult<Self> {
        let conn = Connection::open(db_path)?;

        // Cascade deletes depend on FK enforcement, which SQLite leaves off
        // by default on every new connection.
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Database {
            conn: Mutex::new(conn),
        };

        db.create_tables()?;
        db.create_indexes()?;

        Ok(db)
    }

    fn create_tables(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS workspaces (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created TEXT NOT NULL,
                last_modified TEXT NOT NULL,
                app_config_title TEXT DEFAULT 'Simple Todo App',
                app_config_created TEXT,
                app_config_updated TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS note_blocks (
                id INTEGER PRIMARY KEY,
                head TEXT NOT NULL DEFAULT '',
                metadata_created TEXT NOT NULL,
                metadata_updated TEXT NOT NULL,
                workspace_id TEXT NOT NULL,
                FOREIGN KEY (workspace_id) REFERENCES workspaces(id) ON DELETE CASCADE
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY,
                priority TEXT DEFAULT 'medium',
                head TEXT NOT NULL,
                note TEXT DEFAULT '',
                metadata_created TEXT NOT NULL,
                metadata_updated TEXT NOT NULL,
                metadata_completed INTEGER DEFAULT 0,
                note_block_id INTEGER NOT NULL,
                FOREIGN KEY (note_block_id) REFERENCES note_blocks(id) ON DELETE CASCADE
            )",
            [],
        )?;

        Ok(())
    }

    fn create_indexes(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        let indexes = [
            "CREATE INDEX IF NOT EXISTS idx_note_blocks_workspace ON note_blocks(workspace_id)",
            "CREATE INDEX IF NOT EXISTS idx_notes_note_block ON notes(note_block_id)",
            "CREATE INDEX IF NOT EXISTS idx_notes_priority ON notes(priority)",
            "CREATE INDEX IF NOT EXISTS idx_notes_completed ON notes(metadata_completed)",
        ];

        for index in indexes {
            conn.execute(index, [])?;
        }

        Ok(())
    }
}
