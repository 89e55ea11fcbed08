//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the participant data access contract.
//! - Isolate SQLite query details from registration orchestration.
//!
//! # Invariants
//! - There is no update or delete path for stored participants.
//! - Repository APIs return semantic errors (`DuplicateUid`) in addition to
//!   storage transport errors.

pub mod participant_repo;
pub mod participant_store;
