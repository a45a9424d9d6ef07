//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract consumed by the note service.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Note::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod note_repo;
