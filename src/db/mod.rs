//! SQLite store: versioned additive migrations, keyed CRUD and defensive
//! row decoding that never fails a whole load.

mod log;
mod migrate;
mod queries;

pub use log::record_operation;
pub use queries::{
    delete_item, delete_ticket, insert_item, insert_ticket, load_items, load_tickets,
    update_item_pause, update_ticket_completion, update_ticket_pause,
};

use crate::errors::AppResult;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

/// Handle to the active store. Dropping it closes the connection.
pub struct Store {
    pub conn: Connection,
    path: PathBuf,
}

impl Store {
    /// Opens (or creates) the database at `path` and brings its schema up to
    /// date. Works against stores written by any earlier schema version.
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        migrate::run_pending_migrations(&conn)
            .map_err(|e| crate::errors::AppError::Migration(e.to_string()))?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
