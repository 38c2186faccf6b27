//! Store layer: capability traits over the three entity stores plus their
//! SQLite implementations.
//!
//! Handlers only ever see the traits, so an alternate backing store can be
//! swapped in without touching the HTTP layer.

pub mod note_blocks;
pub mod notes;
pub mod workspaces;

use std::sync::Arc;

use thiserror::Error;

use crate::db::Database;
use crate::models::{ExportData, Note, NoteBlock, Priority, Workspace};

/// All errors a store operation can produce.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error("note block not found: {0}")]
    NoteBlockNotFound(i64),

    #[error("note not found: {0}")]
    NoteNotFound(i64),

    /// Underlying SQLite failure: unreachable store, constraint violation,
    /// failed transaction.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to import workspace {id}: {source}")]
    Import {
        id: String,
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    /// True for the missing-entity conditions the adapter maps to 404.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::WorkspaceNotFound(_)
                | StoreError::NoteBlockNotFound(_)
                | StoreError::NoteNotFound(_)
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD and filtered queries over notes, scoped by parent block.
pub trait NoteStore: Send + Sync {
    /// Persist a note under `note_block_id`, defaulting timestamps and the
    /// completed flag, and adopting the generated id when the caller passed 0.
    fn create(&self, note: Note, note_block_id: i64) -> StoreResult<Note>;
    fn get_by_id(&self, id: i64) -> StoreResult<Note>;
    /// All notes in a block, ordered by id ascending.
    fn list_by_block(&self, note_block_id: i64) -> StoreResult<Vec<Note>>;
    /// Overwrites `updated` with the current time before persisting.
    fn update(&self, note: Note) -> StoreResult<Note>;
    fn delete(&self, id: i64) -> StoreResult<()>;
    /// Flip the completed flag in place, stamping `updated`. No prior read.
    fn toggle_completed(&self, id: i64) -> StoreResult<()>;
    fn list_by_priority(&self, note_block_id: i64, priority: Priority) -> StoreResult<Vec<Note>>;
    fn list_completed(&self, note_block_id: i64) -> StoreResult<Vec<Note>>;
    fn list_pending(&self, note_block_id: i64) -> StoreResult<Vec<Note>>;
}

/// CRUD over note blocks, scoped by parent workspace.
pub trait NoteBlockStore: Send + Sync {
    fn create(&self, block: NoteBlock, workspace_id: &str) -> StoreResult<NoteBlock>;
    fn get_by_id(&self, id: i64) -> StoreResult<NoteBlock>;
    /// All blocks in a workspace, ordered by id ascending.
    fn list_by_workspace(&self, workspace_id: &str) -> StoreResult<Vec<NoteBlock>>;
    fn update(&self, block: NoteBlock) -> StoreResult<NoteBlock>;
    /// Child notes go with the block via FK cascade.
    fn delete(&self, id: i64) -> StoreResult<()>;
    /// Block plus its notes; the notes collection is present even when empty.
    fn get_with_notes(&self, id: i64) -> StoreResult<NoteBlock>;
}

/// CRUD over workspaces plus hierarchy assembly and bulk transfer.
pub trait WorkspaceStore: Send + Sync {
    /// Persist the workspace row, then any note blocks (and their notes)
    /// supplied inline. Not atomic; only `import_workspaces` is.
    fn create(&self, workspace: Workspace) -> StoreResult<Workspace>;
    fn get_by_id(&self, id: &str) -> StoreResult<Workspace>;
    /// All workspaces, ordered by creation time ascending.
    fn list_all(&self) -> StoreResult<Vec<Workspace>>;
    fn update(&self, workspace: Workspace) -> StoreResult<Workspace>;
    fn delete(&self, id: &str) -> StoreResult<()>;
    /// The canonical deep read: workspace, its blocks, and every block's notes.
    fn get_with_full_hierarchy(&self, id: &str) -> StoreResult<Workspace>;
    /// All-or-nothing bulk create inside a single transaction.
    fn import_workspaces(&self, workspaces: Vec<Workspace>) -> StoreResult<Vec<Workspace>>;
    /// Full-hierarchy snapshot of every workspace, wrapped with an export
    /// timestamp and format version.
    fn export_all(&self) -> StoreResult<ExportData>;
}

/// Store container handed to the HTTP layer at construction time.
pub struct Stores {
    pub workspace: Arc<dyn WorkspaceStore>,
    pub note_block: Arc<dyn NoteBlockStore>,
    pub note: Arc<dyn NoteStore>,
}

impl Stores {
    /// Build the SQLite-backed store set over a shared database handle.
    pub fn new(db: Arc<Database>) -> Self {
        Stores {
            workspace: Arc::new(workspaces::SqliteWorkspaceStore::new(Arc::clone(&db))),
            note_block: Arc::new(note_blocks::SqliteNoteBlockStore::new(Arc::clone(&db))),
            note: Arc::new(notes::SqliteNoteStore::new(db)),
        }
    }
}
