//! Access control for note operations and admin-gated features.
//!
//! # Responsibility
//! - Model user roles as an enum with an explicit privilege predicate.
//! - Provide ownership and privilege guards used by services.
//!
//! # Invariants
//! - Guards deny by default: anything not explicitly allowed is rejected.

pub mod guard;
pub mod role;
