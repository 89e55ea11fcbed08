//! Domain model for desk registrations.
//!
//! # Responsibility
//! - Define the candidate form, the validated payload and the stored record.
//! - Own the registration validation rules.
//!
//! # Invariants
//! - A `Participant` is never mutated after it is stored.
//! - `uid` is assigned by the caller and is unique per stored record.

pub mod participant;
pub mod registration;
