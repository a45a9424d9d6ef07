//! Note use-case service.
//!
//! # Responsibility
//! - Provide owner-scoped list/create/get/update/delete APIs.
//! - Apply creation defaults and partial-update merge semantics.
//! - Enforce ownership before any mutation.
//!
//! # Invariants
//! - The requester identity is always an explicit argument.
//! - Existence is checked before ownership, so a missing note reports
//!   `NotFound` to every requester while an existing foreign note reports
//!   `Unauthorized`.
//! - Concurrent updates to one note are last-write-wins.
//! - Log events carry ids and outcomes only, never titles or content.

use crate::auth::guard::{ensure_owner, AccessError};
use crate::model::note::{NewNote, Note, NoteId, NotePatch, NoteValidationError, UserId};
use crate::repo::note_repo::{NoteRepository, RepoError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Coarse failure category exposed to transport adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller input must be corrected.
    Validation,
    /// Referenced note does not exist.
    NotFound,
    /// Caller does not own the referenced note.
    Unauthorized,
    /// Underlying store failure.
    Persistence,
}

impl ErrorKind {
    /// Stable code used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Persistence => "persistence",
        }
    }

    /// HTTP status an adapter should answer with.
    pub fn http_status(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Unauthorized => 401,
            Self::NotFound => 404,
            Self::Persistence => 500,
        }
    }
}

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Input violates note invariants.
    Validation(NoteValidationError),
    /// Target note does not exist.
    NotFound(NoteId),
    /// Requester is not allowed to touch the target note.
    Unauthorized(AccessError),
    /// Persistence-layer failure.
    Persistence(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl NoteServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Persistence(_) | Self::InconsistentState(_) => ErrorKind::Persistence,
        }
    }
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Unauthorized(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Unauthorized(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::NotFound(_) | Self::InconsistentState(_) => None,
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<AccessError> for NoteServiceError {
    fn from(value: AccessError) -> Self {
        Self::Unauthorized(value)
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Persistence(other),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all notes owned by `owner`, pinned first then newest first.
    ///
    /// An empty list is a regular outcome.
    pub fn list_notes(&self, owner: &UserId) -> Result<Vec<Note>, NoteServiceError> {
        let started_at = Instant::now();
        let result = self
            .repo
            .find_by_owner_sorted(owner)
            .map_err(NoteServiceError::from);
        match &result {
            Ok(notes) => debug!(
                "event=note_list module=service status=ok count={} duration_ms={}",
                notes.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_list", None, started_at, err),
        }
        result
    }

    /// Creates one note owned by `owner`.
    ///
    /// # Contract
    /// - Blank or missing title fails with `Validation` and persists nothing.
    /// - `color`, `priority`, `content` fall back to their defaults and
    ///   `is_pinned` starts as `false`.
    pub fn create_note(&self, owner: &UserId, draft: NewNote) -> Result<Note, NoteServiceError> {
        let started_at = Instant::now();
        let result = self.create_note_inner(owner, draft);
        log_outcome("note_create", None, started_at, &result);
        result
    }

    /// Gets one note the requester owns.
    pub fn get_note(&self, requester: &UserId, note_id: NoteId) -> Result<Note, NoteServiceError> {
        let started_at = Instant::now();
        let result = self.load_owned(requester, note_id);
        match &result {
            Ok(_) => debug!(
                "event=note_get module=service status=ok note_id={note_id} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_get", Some(note_id), started_at, err),
        }
        result
    }

    /// Applies a partial update to a note the requester owns.
    ///
    /// # Contract
    /// - Only fields present in `patch` change.
    /// - An empty patch succeeds and returns the stored note unchanged.
    /// - A present but blank title fails with `Validation`; nothing is written.
    pub fn update_note(
        &self,
        requester: &UserId,
        note_id: NoteId,
        patch: NotePatch,
    ) -> Result<Note, NoteServiceError> {
        let started_at = Instant::now();
        let result = self.update_note_inner(requester, note_id, patch);
        log_outcome("note_update", Some(note_id), started_at, &result);
        result
    }

    /// Permanently deletes a note the requester owns.
    pub fn delete_note(&self, requester: &UserId, note_id: NoteId) -> Result<(), NoteServiceError> {
        let started_at = Instant::now();
        let result = self
            .load_owned(requester, note_id)
            .and_then(|note| {
                self.repo
                    .delete_by_id(note.id)
                    .map_err(NoteServiceError::from)
            });
        match &result {
            Ok(()) => info!(
                "event=note_delete module=service status=ok note_id={note_id} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_delete", Some(note_id), started_at, err),
        }
        result
    }

    fn create_note_inner(&self, owner: &UserId, draft: NewNote) -> Result<Note, NoteServiceError> {
        let note = Note::create(owner.clone(), draft, now_epoch_ms())?;
        let note_id = self.repo.insert(&note)?;
        self.repo
            .find_by_id(note_id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    fn update_note_inner(
        &self,
        requester: &UserId,
        note_id: NoteId,
        patch: NotePatch,
    ) -> Result<Note, NoteServiceError> {
        let mut note = self.load_owned(requester, note_id)?;
        if patch.is_empty() {
            return Ok(note);
        }

        note.apply_patch(patch)?;
        self.repo.save(&note)?;
        self.repo
            .find_by_id(note_id)?
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    fn load_owned(&self, requester: &UserId, note_id: NoteId) -> Result<Note, NoteServiceError> {
        let note = self
            .repo
            .find_by_id(note_id)?
            .ok_or(NoteServiceError::NotFound(note_id))?;
        ensure_owner(&note, requester)?;
        Ok(note)
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn log_outcome(
    event: &str,
    note_id: Option<NoteId>,
    started_at: Instant,
    result: &Result<Note, NoteServiceError>,
) {
    match result {
        Ok(note) => info!(
            "event={event} module=service status=ok note_id={} duration_ms={}",
            note.id,
            started_at.elapsed().as_millis()
        ),
        Err(err) => log_failure(event, note_id, started_at, err),
    }
}

fn log_failure(event: &str, note_id: Option<NoteId>, started_at: Instant, err: &NoteServiceError) {
    let note_id = note_id
        .or(match err {
            NoteServiceError::NotFound(id) => Some(*id),
            _ => None,
        })
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    let kind = err.kind();
    let duration_ms = started_at.elapsed().as_millis();

    // Caller mistakes are expected traffic; only store failures are errors.
    if kind == ErrorKind::Persistence {
        error!(
            "event={event} module=service status=error note_id={note_id} duration_ms={duration_ms} error_code={} error={err}",
            kind.as_str()
        );
    } else {
        warn!(
            "event={event} module=service status=rejected note_id={note_id} duration_ms={duration_ms} error_code={}",
            kind.as_str()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, NoteService, NoteServiceError};
    use crate::db::DbError;
    use crate::model::note::{NewNote, Note, NoteId, NotePatch, UserId};
    use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
    use std::cell::RefCell;

    /// Repository whose every call fails with a store error.
    struct BrokenRepository;

    fn store_down() -> RepoError {
        RepoError::Db(DbError::Sqlite(rusqlite::Error::InvalidQuery))
    }

    impl NoteRepository for BrokenRepository {
        fn find_by_owner_sorted(&self, _owner: &UserId) -> RepoResult<Vec<Note>> {
            Err(store_down())
        }
        fn find_by_id(&self, _id: NoteId) -> RepoResult<Option<Note>> {
            Err(store_down())
        }
        fn insert(&self, _note: &Note) -> RepoResult<NoteId> {
            Err(store_down())
        }
        fn save(&self, _note: &Note) -> RepoResult<()> {
            Err(store_down())
        }
        fn delete_by_id(&self, _id: NoteId) -> RepoResult<()> {
            Err(store_down())
        }
    }

    /// Repository that records writes so tests can assert none happened.
    #[derive(Default)]
    struct RecordingRepository {
        notes: RefCell<Vec<Note>>,
        writes: RefCell<usize>,
    }

    impl NoteRepository for RecordingRepository {
        fn find_by_owner_sorted(&self, owner: &UserId) -> RepoResult<Vec<Note>> {
            Ok(self
                .notes
                .borrow()
                .iter()
                .filter(|note| note.owner == *owner)
                .cloned()
                .collect())
        }
        fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
            Ok(self.notes.borrow().iter().find(|note| note.id == id).cloned())
        }
        fn insert(&self, note: &Note) -> RepoResult<NoteId> {
            *self.writes.borrow_mut() += 1;
            self.notes.borrow_mut().push(note.clone());
            Ok(note.id)
        }
        fn save(&self, note: &Note) -> RepoResult<()> {
            *self.writes.borrow_mut() += 1;
            let mut notes = self.notes.borrow_mut();
            let slot = notes
                .iter_mut()
                .find(|stored| stored.id == note.id)
                .ok_or(RepoError::NotFound(note.id))?;
            *slot = note.clone();
            Ok(())
        }
        fn delete_by_id(&self, id: NoteId) -> RepoResult<()> {
            *self.writes.borrow_mut() += 1;
            self.notes.borrow_mut().retain(|note| note.id != id);
            Ok(())
        }
    }

    fn user(value: &str) -> UserId {
        UserId::new(value).unwrap()
    }

    #[test]
    fn store_failures_surface_as_persistence_kind() {
        let service = NoteService::new(BrokenRepository);
        let err = service.list_notes(&user("u1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);

        let err = service
            .create_note(&user("u1"), NewNote::new("title"))
            .unwrap_err();
        assert!(matches!(err, NoteServiceError::Persistence(_)));

        let err = service
            .delete_note(&user("u1"), NoteId::new_v4())
            .unwrap_err();
        assert_eq!(err.kind().http_status(), 500);
    }

    #[test]
    fn create_with_blank_title_writes_nothing() {
        let service = NoteService::new(RecordingRepository::default());
        let err = service
            .create_note(&user("u1"), NewNote::new(""))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(*service.repo.writes.borrow(), 0);
    }

    #[test]
    fn empty_patch_skips_the_write() {
        let service = NoteService::new(RecordingRepository::default());
        let created = service
            .create_note(&user("u1"), NewNote::new("keep"))
            .unwrap();

        let updated = service
            .update_note(&user("u1"), created.id, NotePatch::default())
            .unwrap();
        assert_eq!(updated, created);
        assert_eq!(*service.repo.writes.borrow(), 1);
    }

    #[test]
    fn foreign_update_is_rejected_before_any_write() {
        let service = NoteService::new(RecordingRepository::default());
        let created = service
            .create_note(&user("u1"), NewNote::new("mine"))
            .unwrap();

        let err = service
            .update_note(
                &user("u2"),
                created.id,
                NotePatch {
                    title: Some("x".to_string()),
                    ..NotePatch::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(*service.repo.writes.borrow(), 1);
    }

    #[test]
    fn error_kinds_map_to_adapter_statuses() {
        assert_eq!(ErrorKind::Validation.http_status(), 400);
        assert_eq!(ErrorKind::Unauthorized.http_status(), 401);
        assert_eq!(ErrorKind::NotFound.http_status(), 404);
        assert_eq!(ErrorKind::Persistence.http_status(), 500);
    }
}
