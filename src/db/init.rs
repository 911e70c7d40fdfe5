/// Database schema initialization.
/// Sets up SQLite WAL mode and creates tables on startup.
use rusqlite::{Connection, Result as SqliteResult};

/// Initialize database connection with WAL mode and schema
pub fn initialize_database(conn: &Connection) -> SqliteResult<()> {
    // WAL is only honoured for file-based databases; in-memory ones report "memory"
    let _: SqliteResult<String> = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0));
    let _ = conn.execute("PRAGMA synchronous = NORMAL", []);

    create_schema(conn)?;

    Ok(())
}

/// Create all database tables
fn create_schema(conn: &Connection) -> SqliteResult<()> {
    // message.posted_by is deliberately not a foreign key: accounts may be
    // deleted and leave their messages behind.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS account (
            account_id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS message (
            message_id INTEGER PRIMARY KEY AUTOINCREMENT,
            posted_by INTEGER NOT NULL,
            message_text TEXT NOT NULL,
            time_posted_epoch INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_message_posted_by ON message(posted_by);
        "#,
    )?;

    Ok(())
}
