pub mod note;
pub mod workspace;

pub use note::{Metadata, Note, NoteBlock, Priority};
pub use workspace::{AppConfig, AppData, ExportData, ImportRequest, Workspace};
