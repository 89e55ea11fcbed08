use onspot_core::db::migrations::latest_version;
use onspot_core::db::{open_db, open_db_in_memory, DbError};
use onspot_core::{ParticipantRepository, ParticipantStore, SqliteParticipantRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(
        column_names(&conn),
        vec!["id", "uid", "name", "email", "phone", "created_at", "college", "dept", "year"]
    );
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("onspot.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(column_names(&conn_second).len(), 9);
}

#[test]
fn legacy_table_without_academic_columns_is_upgraded_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE participants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uid TEXT UNIQUE,
            name TEXT,
            email TEXT,
            phone TEXT,
            created_at TEXT
        );
        INSERT INTO participants (uid, name, email, phone, created_at)
        VALUES ('ONSPOT-1', 'Legacy', 'legacy@gmail.com', '9999999999', '2025-01-01 08:00:00');",
    )
    .unwrap();
    drop(conn);

    let store = ParticipantStore::new(&path);
    store.initialize().unwrap();
    store.initialize().unwrap();

    let rows = store.list_all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].uid, "ONSPOT-1");
    assert_eq!(rows[0].name, "Legacy");
    assert_eq!(rows[0].college, "");
    assert_eq!(rows[0].dept, "");
    assert_eq!(rows[0].year, "");
    assert_eq!(rows[0].created_at, "2025-01-01 08:00:00");
}

#[test]
fn legacy_table_with_partial_columns_only_gains_missing_ones() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE participants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uid TEXT UNIQUE,
            name TEXT,
            email TEXT,
            phone TEXT,
            college TEXT,
            created_at TEXT
        );
        INSERT INTO participants (uid, name, email, phone, college, created_at)
        VALUES ('ONSPOT-7', 'Partial', 'p@gmail.com', '8888888888', 'Kept College', '2025-01-02 08:00:00');",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let repo = SqliteParticipantRepository::try_new(&conn).unwrap();
    let rows = repo.list_all().unwrap();
    assert_eq!(rows[0].college, "Kept College");
    assert_eq!(rows[0].dept, "");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(participants);").unwrap();
    stmt.query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}
