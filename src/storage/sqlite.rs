//! SQLite storage implementation

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use rusqlite::{params, Connection, OpenFlags, Params};
use tracing::{debug, info};
use crate::{Error, Result};
use crate::query::Lookup;
use super::result::{ResultSet, Value};
use super::schema;

/// Extensions tried when the database locator is an extension-less base path
const DATABASE_EXTENSIONS: &[&str] = &["db", "sqlite", "sqlite3"];

/// Resolve a database locator to an existing file.
///
/// Accepts the file itself or its base (`.../bcb` finds `.../bcb.db`).
pub fn locate_database(base: &Path) -> Option<PathBuf> {
    if base.is_file() {
        return Some(base.to_path_buf());
    }

    DATABASE_EXTENSIONS.iter().find_map(|ext| {
        let mut name = OsString::from(base.as_os_str());
        name.push(".");
        name.push(ext);
        let candidate = PathBuf::from(name);
        candidate.is_file().then_some(candidate)
    })
}

/// Read-only handle on the benchmark database.
///
/// Owns exactly one connection. It is released by `close` or, on any other
/// exit path, when the store is dropped.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an existing database file read-only (never creates one)
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::DatabaseNotFound(path.to_path_buf()));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .map_err(|e| Error::Connection(format!("{}: {}", path.display(), e)))?;

        // SQLite opens lazily; touch the header so a non-database file fails here
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))
            .map_err(|e| Error::Connection(format!("{}: {}", path.display(), e)))?;

        info!("Opened database {}", path.display());
        Ok(Self { conn })
    }

    /// Open an in-memory database with the expected schema (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }
        Ok(Self { conn })
    }

    /// Raw connection, used to seed fixtures
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Execute a parameterized statement and fetch every row.
    ///
    /// Column names come back in result order, so callers can render
    /// whatever the schema holds.
    pub fn query<P: Params>(&self, sql: &str, params: P) -> Result<ResultSet> {
        debug!(sql = sql.trim(), "executing query");
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut result = ResultSet::new(columns);
        let mut rows = stmt.query(params)?;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(Value::from(row.get_ref(idx)?));
            }
            result.push(values);
        }

        debug!(rows = result.len(), "query complete");
        Ok(result)
    }

    // ========== Benchmark Queries ==========

    /// Function rows for one id, or for either of two ids
    pub fn function_rows(&self, lookup: &Lookup) -> Result<ResultSet> {
        match *lookup {
            Lookup::Single(id) => self.query("SELECT * FROM FUNCTIONS WHERE ID = ?1", [id]),
            Lookup::Pair(a, b) => self.query(
                "SELECT * FROM FUNCTIONS WHERE ID = ?1 OR ID = ?2",
                params![a, b],
            ),
        }
    }

    /// Clone pair rows.
    ///
    /// One id matches every pair touching it. Two ids match only the pair
    /// between them, stored in either order.
    pub fn clone_pair_rows(&self, lookup: &Lookup) -> Result<ResultSet> {
        match *lookup {
            Lookup::Single(id) => self.query(
                "SELECT * FROM CLONES WHERE FUNCTION_ID_ONE = ?1 OR FUNCTION_ID_TWO = ?1",
                [id],
            ),
            Lookup::Pair(a, b) => self.query(
                r#"
                SELECT * FROM CLONES
                WHERE (FUNCTION_ID_ONE = ?1 AND FUNCTION_ID_TWO = ?2)
                   OR (FUNCTION_ID_ONE = ?2 AND FUNCTION_ID_TWO = ?1)
                "#,
                params![a, b],
            ),
        }
    }

    /// First `limit` rows of a table
    pub fn table_preview(&self, table: &str, limit: usize) -> Result<ResultSet> {
        let sql = format!("SELECT * FROM \"{}\" LIMIT ?1", table.replace('"', "\"\""));
        self.query(&sql, [limit as i64])
    }

    /// Close the connection, surfacing any error from the driver
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| Error::Connection(e.to_string()))?;
        info!("Database connection closed");
        Ok(())
    }
}
