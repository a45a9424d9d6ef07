//! Ownership and privilege guards.

use crate::auth::role::{Identity, Role};
use crate::model::note::{Note, NoteId, UserId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Access denial reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Requester is not the owner of the target note.
    NotOwner { note_id: NoteId, requester: UserId },
    /// Operation is admin-gated and the identity's role is not privileged.
    PrivilegeRequired { user_id: UserId, role: Role },
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOwner { note_id, requester } => {
                write!(f, "user `{requester}` does not own note {note_id}")
            }
            Self::PrivilegeRequired { user_id, role } => write!(
                f,
                "user `{user_id}` with role `{role}` is not allowed to use admin operations"
            ),
        }
    }
}

impl Error for AccessError {}

/// Allows the call only when `requester` owns `note`.
pub fn ensure_owner(note: &Note, requester: &UserId) -> Result<(), AccessError> {
    if note.owner == *requester {
        return Ok(());
    }
    Err(AccessError::NotOwner {
        note_id: note.id,
        requester: requester.clone(),
    })
}

/// Allows the call only for admin or superadmin identities.
pub fn ensure_privileged(identity: &Identity) -> Result<(), AccessError> {
    if identity.role.is_privileged() {
        return Ok(());
    }
    Err(AccessError::PrivilegeRequired {
        user_id: identity.user_id.clone(),
        role: identity.role,
    })
}
