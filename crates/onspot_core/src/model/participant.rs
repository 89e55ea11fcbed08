//! Participant records and identity payloads.
//!
//! # Responsibility
//! - Define the validated `RegistrationPayload` handed to persistence.
//! - Define the stored `Participant` read model.
//! - Generate caller-side registration uids.
//!
//! # Invariants
//! - `created_at` is assigned by the store, never by callers.
//! - Optional academic fields are always present on read, possibly empty.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Caller-assigned registration identifier.
///
/// The format is opaque to storage; only uniqueness is enforced.
pub type ParticipantUid = String;

const UID_PREFIX: &str = "ONSPOT";

/// Validated registration payload ready for insert.
///
/// Serialized field order doubles as the QR payload key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationPayload {
    pub uid: ParticipantUid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub dept: String,
    /// Degree programme, stored in the legacy `year` column.
    pub year: String,
}

/// One stored registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub uid: ParticipantUid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub dept: String,
    pub year: String,
    /// UTC `YYYY-MM-DD HH:MM:SS`, written by SQLite at insert time.
    pub created_at: String,
}

impl Participant {
    /// Returns the submitted fields of this record without `created_at`.
    pub fn payload(&self) -> RegistrationPayload {
        RegistrationPayload {
            uid: self.uid.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            college: self.college.clone(),
            dept: self.dept.clone(),
            year: self.year.clone(),
        }
    }

    /// Fields in export column order.
    pub fn columns(&self) -> [&str; 8] {
        [
            self.uid.as_str(),
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.college.as_str(),
            self.dept.as_str(),
            self.year.as_str(),
            self.created_at.as_str(),
        ]
    }
}

/// Generates a fresh registration uid: `ONSPOT-<epoch_ms>-<8 hex>`.
///
/// The random suffix keeps two submissions in the same millisecond distinct.
pub fn generate_uid() -> ParticipantUid {
    let epoch_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis());
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{UID_PREFIX}-{epoch_ms}-{}", &suffix[..8])
}
