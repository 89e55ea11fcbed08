//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register additive schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Every step is safe to re-run against a table created by an older desk
//!   build that never recorded `user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// One schema change inside a migration.
#[derive(Debug, Clone, Copy)]
enum MigrationStep {
    /// Idempotent SQL batch (`CREATE ... IF NOT EXISTS`).
    Sql(&'static str),
    /// Adds `column` to `table` unless a column with that name already exists.
    AddColumnIfMissing {
        table: &'static str,
        column: &'static str,
        definition: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    steps: &'static [MigrationStep],
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        steps: &[MigrationStep::Sql(include_str!("0001_participants.sql"))],
    },
    Migration {
        version: 2,
        steps: &[
            MigrationStep::AddColumnIfMissing {
                table: "participants",
                column: "college",
                definition: "TEXT DEFAULT ''",
            },
            MigrationStep::AddColumnIfMissing {
                table: "participants",
                column: "dept",
                definition: "TEXT DEFAULT ''",
            },
            MigrationStep::AddColumnIfMissing {
                table: "participants",
                column: "year",
                definition: "TEXT DEFAULT ''",
            },
        ],
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        for step in migration.steps {
            apply_step(&tx, *step)?;
        }
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

/// Returns whether `table` currently has a column named `column`.
pub fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Returns whether a table named `table` exists.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn apply_step(conn: &Connection, step: MigrationStep) -> DbResult<()> {
    match step {
        MigrationStep::Sql(sql) => conn.execute_batch(sql)?,
        MigrationStep::AddColumnIfMissing {
            table,
            column,
            definition,
        } => {
            if !table_has_column(conn, table, column)? {
                conn.execute_batch(&format!(
                    "ALTER TABLE {table} ADD COLUMN {column} {definition};"
                ))?;
                info!("event=db_add_column module=db status=ok table={table} column={column}");
            }
        }
    }
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
