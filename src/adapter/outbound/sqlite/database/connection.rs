//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling, migration support, and connection
//! configuration for SQLite databases.

use std::path::Path;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// In-memory database URL. Every connection sees its own database, so pools
/// for it hold a single connection.
pub const MEMORY: &str = ":memory:";

/// Applies connection pragmas whenever the pool opens a connection.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        diesel::sql_query("PRAGMA busy_timeout=5000")
            .execute(conn)
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a connection pool for the given database URL.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let max_size = if database_url == MEMORY { 1 } else { 4 };
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Run all pending database migrations.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

/// Open a migrated pool, creating the database file and its parent
/// directory when needed.
///
/// # Errors
/// Returns an error if the directory, pool, or schema cannot be created.
pub fn open(database_path: &str) -> Result<DbPool> {
    if database_path != MEMORY {
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    let pool = create_pool(database_path)?;
    run_migrations(&pool)?;
    Ok(pool)
}

/// SQLite URI that opens `database_path` read-only, never creating it.
#[must_use]
pub fn read_only_url(database_path: &str) -> String {
    let mut encoded = String::with_capacity(database_path.len());
    for c in database_path.chars() {
        match c {
            '%' => encoded.push_str("%25"),
            '?' => encoded.push_str("%3f"),
            '#' => encoded.push_str("%23"),
            _ => encoded.push(c),
        }
    }
    format!("file:{encoded}?mode=ro")
}

/// Open a single read-only connection, without running migrations.
///
/// # Errors
/// Returns an error if the file is missing or is not a SQLite database.
pub fn open_read_only(database_path: &str) -> Result<SqliteConnection> {
    SqliteConnection::establish(&read_only_url(database_path))
        .map_err(|e| Error::Database(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(diesel::QueryableByName)]
    struct TableName {
        #[diesel(sql_type = diesel::sql_types::Text)]
        name: String,
    }

    #[derive(diesel::QueryableByName)]
    struct Timeout {
        #[diesel(sql_type = diesel::sql_types::BigInt)]
        timeout: i64,
    }

    fn tables(pool: &DbPool) -> Vec<String> {
        let mut conn = pool.get().unwrap();
        diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
        )
        .load::<TableName>(&mut conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect()
    }

    #[test]
    fn memory_pool_holds_one_connection() {
        let pool = create_pool(MEMORY).unwrap();
        assert_eq!(pool.max_size(), 1);
    }

    #[test]
    fn run_migrations_creates_subscribers_table() {
        let pool = open(MEMORY).unwrap();
        assert_eq!(tables(&pool), vec!["subscribers".to_string()]);
    }

    #[test]
    fn run_migrations_is_idempotent() {
        let pool = open(MEMORY).unwrap();
        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();
        assert_eq!(tables(&pool), vec!["subscribers".to_string()]);
    }

    #[test]
    fn connections_get_busy_timeout() {
        let pool = create_pool(MEMORY).unwrap();
        let mut conn = pool.get().unwrap();
        let rows: Vec<Timeout> = diesel::sql_query("PRAGMA busy_timeout")
            .load(&mut conn)
            .unwrap();
        assert_eq!(rows[0].timeout, 5000);
    }

    #[test]
    fn read_only_url_escapes_uri_characters() {
        assert_eq!(read_only_url("/srv/db/subs.db"), "file:/srv/db/subs.db?mode=ro");
        assert_eq!(read_only_url("a?b#c%d.db"), "file:a%3fb%23c%25d.db?mode=ro");
    }

    #[test]
    fn read_only_connection_cannot_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subscribers.db");
        let path = path.to_str().unwrap();
        open(path).unwrap();

        let mut conn = open_read_only(path).unwrap();
        let write = diesel::sql_query("CREATE TABLE extra (id INTEGER)").execute(&mut conn);
        assert!(write.is_err());
    }

    #[test]
    fn open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("subscribers.db");
        let pool = open(path.to_str().unwrap()).unwrap();

        assert!(path.exists());
        assert_eq!(tables(&pool), vec!["subscribers".to_string()]);
    }
}
