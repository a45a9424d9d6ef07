//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record, owner identity and tag enums.
//! - Apply creation defaults and partial-update patches.
//!
//! # Invariants
//! - `id`, `owner` and `created_at` never change after creation.
//! - `title` is never blank.
//! - A patch only touches fields it explicitly carries.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of one note.
pub type NoteId = Uuid;

/// Opaque identity of the user acting on notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Builds a user id from its trimmed form, rejecting blank values.
    ///
    /// `"u1 "` and `"u1"` name the same owner.
    pub fn new(value: impl Into<String>) -> Result<Self, NoteValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(NoteValidationError::EmptyOwner);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = NoteValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Display color tag of a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    #[default]
    Yellow,
    Blue,
    Green,
    Pink,
    Purple,
    Orange,
}

impl NoteColor {
    /// Stable lowercase tag used in storage and serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Pink => "pink",
            Self::Purple => "purple",
            Self::Orange => "orange",
        }
    }
}

impl FromStr for NoteColor {
    type Err = NoteValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "yellow" => Ok(Self::Yellow),
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "pink" => Ok(Self::Pink),
            "purple" => Ok(Self::Purple),
            "orange" => Ok(Self::Orange),
            other => Err(NoteValidationError::UnknownColor(other.to_string())),
        }
    }
}

/// Urgency tag of a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    /// Stable lowercase tag used in storage and serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = NoteValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            other => Err(NoteValidationError::UnknownPriority(other.to_string())),
        }
    }
}

/// Validation failures for note input and persisted note state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Title is missing or blank after trim.
    EmptyTitle,
    /// Owner identity is blank.
    EmptyOwner,
    /// Color tag is not one of the supported values.
    UnknownColor(String),
    /// Priority tag is not one of the supported values.
    UnknownPriority(String),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title must not be empty"),
            Self::EmptyOwner => write!(f, "note owner must not be empty"),
            Self::UnknownColor(value) => write!(f, "unsupported note color: `{value}`"),
            Self::UnknownPriority(value) => write!(f, "unsupported note priority: `{value}`"),
        }
    }
}

impl Error for NoteValidationError {}

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    /// Creator identity; sole party allowed to mutate or delete.
    pub owner: UserId,
    pub title: String,
    pub content: String,
    pub color: NoteColor,
    pub priority: Priority,
    pub is_pinned: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Note {
    /// Builds a new note from a draft, applying creation defaults.
    ///
    /// # Invariants
    /// - A fresh `id` is generated.
    /// - `is_pinned` always starts as `false`.
    pub fn create(
        owner: UserId,
        draft: NewNote,
        created_at: i64,
    ) -> Result<Self, NoteValidationError> {
        let note = Self {
            id: Uuid::new_v4(),
            owner,
            title: draft.title,
            content: draft.content.unwrap_or_default(),
            color: draft.color.unwrap_or_default(),
            priority: draft.priority.unwrap_or_default(),
            is_pinned: false,
            created_at,
        };
        note.validate()?;
        Ok(note)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        if self.owner.as_str().trim().is_empty() {
            return Err(NoteValidationError::EmptyOwner);
        }
        Ok(())
    }

    /// Overwrites every field present in `patch`.
    ///
    /// Validation runs before any assignment, so a rejected patch leaves the
    /// note untouched.
    pub fn apply_patch(&mut self, patch: NotePatch) -> Result<(), NoteValidationError> {
        if let Some(title) = patch.title.as_deref() {
            if title.trim().is_empty() {
                return Err(NoteValidationError::EmptyTitle);
            }
        }

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(is_pinned) = patch.is_pinned {
            self.is_pinned = is_pinned;
        }
        Ok(())
    }
}

/// Caller input for note creation.
///
/// A missing `title` deserializes to an empty string and is rejected on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewNote {
    pub title: String,
    pub content: Option<String>,
    pub color: Option<NoteColor>,
    pub priority: Option<Priority>,
}

impl NewNote {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_color(mut self, color: NoteColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Partial update for an existing note.
///
/// `None` means "leave unchanged"; `Some(value)` overwrites, including empty
/// strings and `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<NoteColor>,
    pub priority: Option<Priority>,
    pub is_pinned: Option<bool>,
}

impl NotePatch {
    /// Returns whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.color.is_none()
            && self.priority.is_none()
            && self.is_pinned.is_none()
    }
}
