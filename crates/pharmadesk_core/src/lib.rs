//! Core domain logic for PharmaDesk notes.
//! This crate is the single source of truth for note ownership and update
//! invariants.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::guard::{ensure_owner, ensure_privileged, AccessError};
pub use auth::role::{Identity, Role, RoleParseError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{
    NewNote, Note, NoteColor, NoteId, NotePatch, NoteValidationError, Priority, UserId,
};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::note_service::{ErrorKind, NoteService, NoteServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
