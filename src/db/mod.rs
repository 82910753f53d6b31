// Database module

pub mod migrations;
pub mod schema;

use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::constants::{DB_BUSY_TIMEOUT_MS, DB_FILENAME, FILMSHELF_FOLDER};
use crate::error::Result;

/// Open or create a database at the given path
pub fn open_db(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;

    // WAL keeps readers off the writer's back while a cover is replaced
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    conn.execute_batch(&format!("PRAGMA busy_timeout = {};", DB_BUSY_TIMEOUT_MS))?;

    migrations::run_migrations(&conn)?;

    log::info!("Opened movie database at {}", db_path.display());
    Ok(conn)
}

/// Open a private in-memory database with the schema applied
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Get the database path for a library root
pub fn get_db_path(library_root: &Path) -> PathBuf {
    library_root
        .join(FILMSHELF_FOLDER)
        .join(DB_FILENAME)
}

/// Initialize library folder structure
pub fn init_library_folders(library_root: &Path) -> Result<()> {
    std::fs::create_dir_all(library_root.join(FILMSHELF_FOLDER))?;
    Ok(())
}
