//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into desk use cases.
//! - Keep the operator UI decoupled from storage details.

pub mod registration_service;
pub mod search;
