//! Participant repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert new participants and read them back.
//! - Answer the advisory contact lookup used for duplicate detection.
//!
//! # Invariants
//! - `uid` uniqueness is enforced by the storage layer.
//! - `email`/`phone` are not unique at the storage layer.
//! - `created_at` is assigned by SQLite, never taken from the caller.
//! - Listing is ordered most recent first: `created_at DESC, id DESC`.

use crate::db::migrations::{latest_version, table_exists, table_has_column};
use crate::db::DbError;
use crate::model::participant::{Participant, ParticipantUid, RegistrationPayload};
use log::{error, info};
use rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARTICIPANT_TABLE: &str = "participants";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "uid",
    "name",
    "email",
    "phone",
    "college",
    "dept",
    "year",
    "created_at",
];

const PARTICIPANT_SELECT_SQL: &str = "SELECT
    COALESCE(uid, '') AS uid,
    COALESCE(name, '') AS name,
    COALESCE(email, '') AS email,
    COALESCE(phone, '') AS phone,
    COALESCE(college, '') AS college,
    COALESCE(dept, '') AS dept,
    COALESCE(year, '') AS year,
    COALESCE(created_at, '') AS created_at
FROM participants";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for participant persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    /// A participant with this uid is already stored.
    DuplicateUid(ParticipantUid),
    /// Underlying SQLite/bootstrap fault.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to the read model.
    InvalidData(String),
}

impl RepoError {
    /// Returns whether this is a storage fault the operator can only retry.
    ///
    /// Everything except `DuplicateUid` belongs to this family.
    pub fn is_storage_error(&self) -> bool {
        !matches!(self, Self::DuplicateUid(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateUid(uid) => write!(f, "participant uid already exists: {uid}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "participant repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "participant repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "participant repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted participant: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateUid(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
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

/// Repository interface for participant persistence.
pub trait ParticipantRepository {
    /// Returns the uid of the first participant whose email or phone matches.
    fn find_by_contact(&self, email: &str, phone: &str) -> RepoResult<Option<ParticipantUid>>;
    /// Loads one participant by uid.
    fn find_by_uid(&self, uid: &str) -> RepoResult<Option<Participant>>;
    /// Inserts a new participant and returns the stored record.
    fn insert(&self, payload: &RegistrationPayload) -> RepoResult<Participant>;
    /// Lists every participant, most recent first.
    fn list_all(&self) -> RepoResult<Vec<Participant>>;
}

/// SQLite-backed participant repository over a borrowed connection.
pub struct SqliteParticipantRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParticipantRepository<'conn> {
    /// Creates repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_participant_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ParticipantRepository for SqliteParticipantRepository<'_> {
    fn find_by_contact(&self, email: &str, phone: &str) -> RepoResult<Option<ParticipantUid>> {
        // Legacy rows may lack a uid; they cannot be referenced, so skip them.
        let uid = self
            .conn
            .query_row(
                "SELECT uid
                 FROM participants
                 WHERE uid IS NOT NULL
                   AND (email = ?1 OR phone = ?2)
                 ORDER BY id ASC
                 LIMIT 1;",
                params![email, phone],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(uid)
    }

    fn find_by_uid(&self, uid: &str) -> RepoResult<Option<Participant>> {
        let participant = self
            .conn
            .query_row(
                &format!("{PARTICIPANT_SELECT_SQL} WHERE uid = ?1;"),
                [uid],
                parse_participant_row,
            )
            .optional()?;
        Ok(participant)
    }

    fn insert(&self, payload: &RegistrationPayload) -> RepoResult<Participant> {
        let inserted = self.conn.execute(
            "INSERT INTO participants (
                uid,
                name,
                email,
                phone,
                college,
                dept,
                year,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, datetime('now'));",
            params![
                payload.uid.as_str(),
                payload.name.as_str(),
                payload.email.as_str(),
                payload.phone.as_str(),
                payload.college.as_str(),
                payload.dept.as_str(),
                payload.year.as_str(),
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                info!(
                    "event=participant_insert module=repo status=error error_code=duplicate_uid uid={}",
                    payload.uid
                );
                return Err(RepoError::DuplicateUid(payload.uid.clone()));
            }
            Err(err) => {
                error!(
                    "event=participant_insert module=repo status=error error_code=db_write_failed uid={} error={}",
                    payload.uid, err
                );
                return Err(err.into());
            }
        }

        let stored = self
            .conn
            .query_row(
                &format!("{PARTICIPANT_SELECT_SQL} WHERE id = ?1;"),
                [self.conn.last_insert_rowid()],
                parse_participant_row,
            )
            .optional()?;

        stored.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted participant `{}` not readable", payload.uid))
        })
    }

    fn list_all(&self) -> RepoResult<Vec<Participant>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PARTICIPANT_SELECT_SQL} ORDER BY created_at DESC, id DESC;"
        ))?;
        let participants = stmt
            .query_map([], parse_participant_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(participants)
    }
}

fn parse_participant_row(row: &Row<'_>) -> rusqlite::Result<Participant> {
    Ok(Participant {
        uid: row.get("uid")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        college: row.get("college")?,
        dept: row.get("dept")?,
        year: row.get("year")?,
        created_at: row.get("created_at")?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == SQLITE_CONSTRAINT_UNIQUE
    )
}

fn ensure_participant_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 =
        conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, PARTICIPANT_TABLE)? {
        return Err(RepoError::MissingRequiredTable(PARTICIPANT_TABLE));
    }

    for column in REQUIRED_COLUMNS.iter().copied() {
        if !table_has_column(conn, PARTICIPANT_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: PARTICIPANT_TABLE,
                column,
            });
        }
    }

    Ok(())
}
