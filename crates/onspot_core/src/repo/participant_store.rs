//! File-backed participant store with connection-per-call access.
//!
//! # Responsibility
//! - Own the database path for one desk process.
//! - Open, migrate, use and release a connection for every operation.
//!
//! # Invariants
//! - No connection outlives the call that opened it, including on error paths.
//! - `initialize()` is idempotent and never destroys rows.

use crate::db::{open_db, DbResult};
use crate::model::participant::{Participant, ParticipantUid, RegistrationPayload};
use crate::repo::participant_repo::{
    ParticipantRepository, RepoResult, SqliteParticipantRepository,
};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Participant store bound to one SQLite file.
#[derive(Debug, Clone)]
pub struct ParticipantStore {
    db_path: PathBuf,
}

impl ParticipantStore {
    /// Creates a store for `db_path`. No I/O happens until the first call.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Returns the database file backing this store.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Ensures the participant table exists with the full column set.
    ///
    /// Safe on every process start, including against tables created by
    /// older desk builds that lack the academic columns.
    pub fn initialize(&self) -> DbResult<()> {
        let started_at = Instant::now();
        let conn = open_db(&self.db_path)?;
        drop(conn);
        info!(
            "event=store_init module=store status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn with_repository<T>(
        &self,
        f: impl FnOnce(&SqliteParticipantRepository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let conn = open_db(&self.db_path)?;
        let repo = SqliteParticipantRepository::try_new(&conn)?;
        f(&repo)
    }
}

impl ParticipantRepository for ParticipantStore {
    fn find_by_contact(&self, email: &str, phone: &str) -> RepoResult<Option<ParticipantUid>> {
        self.with_repository(|repo| repo.find_by_contact(email, phone))
    }

    fn find_by_uid(&self, uid: &str) -> RepoResult<Option<Participant>> {
        self.with_repository(|repo| repo.find_by_uid(uid))
    }

    fn insert(&self, payload: &RegistrationPayload) -> RepoResult<Participant> {
        let started_at = Instant::now();
        let stored = self.with_repository(|repo| repo.insert(payload))?;
        info!(
            "event=participant_insert module=store status=ok uid={} duration_ms={}",
            stored.uid,
            started_at.elapsed().as_millis()
        );
        Ok(stored)
    }

    fn list_all(&self) -> RepoResult<Vec<Participant>> {
        let participants = self.with_repository(|repo| repo.list_all())?;
        info!(
            "event=participant_list module=store status=ok count={}",
            participants.len()
        );
        Ok(participants)
    }
}
