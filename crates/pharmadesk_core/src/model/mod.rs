//! Domain model for pharmacy desk notes.
//!
//! # Responsibility
//! - Define the canonical `Note` record and its enumerated tags.
//! - Define create drafts and partial-update patches.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId` and owned by one `UserId`.
//! - Deletion is a hard removal; there is no tombstone state.

pub mod note;
