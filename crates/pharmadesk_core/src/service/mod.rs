//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and access guards into use-case APIs.
//! - Keep transport adapters decoupled from storage details.

pub mod note_service;
