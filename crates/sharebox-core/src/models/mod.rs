//! Domain models shared across the workspace.

mod file;

pub use file::{
    FileRecord, FileRecordResponse, NewFileRecord, PublicFileResponse, ShareLinkResponse,
};
