//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the persistence operations the note service needs:
//!   find-by-owner (sorted), find-by-id, insert, save, delete-by-id.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Note::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `save` never rewrites `owner_id` or `created_at`.
//! - Owner listing is ordered `is_pinned DESC, created_at DESC, uuid ASC`.

use crate::db::DbError;
use crate::model::note::{Note, NoteColor, NoteId, NoteValidationError, Priority, UserId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    owner_id,
    title,
    content,
    color,
    priority,
    is_pinned,
    created_at
FROM notes";

const NOTE_COLUMNS: &[&str] = &[
    "uuid",
    "owner_id",
    "title",
    "content",
    "color",
    "priority",
    "is_pinned",
    "created_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence interface consumed by `NoteService`.
pub trait NoteRepository {
    /// Lists every note of `owner`, pinned first, newest first.
    fn find_by_owner_sorted(&self, owner: &UserId) -> RepoResult<Vec<Note>>;
    /// Gets one note by id regardless of owner.
    fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Inserts a new note and returns its id.
    fn insert(&self, note: &Note) -> RepoResult<NoteId>;
    /// Writes the mutable fields of an existing note.
    fn save(&self, note: &Note) -> RepoResult<()>;
    /// Removes one note permanently.
    fn delete_by_id(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails fast when the `notes` table or one of its columns is missing.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_notes_table_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn find_by_owner_sorted(&self, owner: &UserId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE owner_id = ?1
             ORDER BY is_pinned DESC, created_at DESC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([owner.as_str()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn insert(&self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;

        self.conn.execute(
            "INSERT INTO notes (
                uuid,
                owner_id,
                title,
                content,
                color,
                priority,
                is_pinned,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                note.id.to_string(),
                note.owner.as_str(),
                note.title.as_str(),
                note.content.as_str(),
                note.color.as_str(),
                note.priority.as_str(),
                bool_to_int(note.is_pinned),
                note.created_at,
            ],
        )?;

        Ok(note.id)
    }

    fn save(&self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                color = ?4,
                priority = ?5,
                is_pinned = ?6
             WHERE uuid = ?1;",
            params![
                note.id.to_string(),
                note.title.as_str(),
                note.content.as_str(),
                note.color.as_str(),
                note.priority.as_str(),
                bool_to_int(note.is_pinned),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }
        Ok(())
    }

    fn delete_by_id(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    let owner = UserId::new(row.get::<_, String>("owner_id")?)
        .map_err(|_| RepoError::InvalidData(format!("blank owner_id for note {id}")))?;

    let color_text: String = row.get("color")?;
    let color = color_text.parse::<NoteColor>().map_err(|_| {
        RepoError::InvalidData(format!("invalid color `{color_text}` in notes.color"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = priority_text.parse::<Priority>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in notes.priority"
        ))
    })?;

    let is_pinned = match row.get::<_, i64>("is_pinned")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_pinned value `{other}` in notes.is_pinned"
            )));
        }
    };

    let note = Note {
        id,
        owner,
        title: row.get("title")?,
        content: row.get("content")?,
        color,
        priority,
        is_pinned,
        created_at: row.get("created_at")?,
    };
    // Stored rows are not caller input; a broken row is a store fault.
    note.validate().map_err(|err| {
        RepoError::InvalidData(format!("stored note {id} is invalid: {err}"))
    })?;
    Ok(note)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_notes_table_ready(conn: &Connection) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'notes'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(notes);")?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(1)?);
    }

    for &column in NOTE_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }
    Ok(())
}
