//! Versioned, additive schema migrations.
//!
//! Every migration has a stable id and is recorded in the `log` table as a
//! `migration_applied` row once it has run; pending migrations are applied
//! in declaration order. Migrations only ever add tables or columns — no
//! column is dropped, renamed or rewritten — so a store written by any
//! earlier version upgrades in place without touching existing rows.

use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

struct Migration {
    id: &'static str,
    description: &'static str,
    apply: fn(&Connection) -> Result<()>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "20250901_0001_base_tables",
        description: "Created tickets and fridge_items base tables",
        apply: create_base_tables,
    },
    Migration {
        id: "20250901_0002_ticket_tracking_columns",
        description: "Added completion and pause columns to tickets",
        apply: add_ticket_tracking_columns,
    },
    Migration {
        id: "20250901_0003_item_pause_columns",
        description: "Added pause columns to fridge_items",
        apply: add_item_pause_columns,
    },
];

/// Ensure that the `log` table exists. It doubles as the migration ledger,
/// so it is created outside the versioned list.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, id: &str) -> Result<bool> {
    let mut stmt = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(stmt.query_row([id], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, id: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [id, message],
    )?;
    Ok(())
}

/// Check whether `table` already carries `column`.
fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// `ALTER TABLE ... ADD COLUMN`, skipped when the column already exists.
/// A store whose columns predate its migration markers (or whose log table
/// was lost) must never fail here.
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, ddl: &str) -> Result<()> {
    if table_has_column(conn, table, column)? {
        return Ok(());
    }
    conn.execute(
        &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, ddl),
        [],
    )?;
    Ok(())
}

/// Base relations, matching the layout the earliest stores were written
/// with. `IF NOT EXISTS` keeps this a no-op on a pre-existing store.
fn create_base_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tickets (
            title       TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL,
            due_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS fridge_items (
            name        TEXT NOT NULL,
            added_at    TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn add_ticket_tracking_columns(conn: &Connection) -> Result<()> {
    add_column_if_missing(conn, "tickets", "completed", "INTEGER NOT NULL DEFAULT 0")?;
    add_column_if_missing(conn, "tickets", "completed_at", "TEXT")?;
    add_column_if_missing(conn, "tickets", "paused", "INTEGER NOT NULL DEFAULT 0")?;
    add_column_if_missing(conn, "tickets", "paused_at", "TEXT")?;
    add_column_if_missing(conn, "tickets", "frozen_remaining", "TEXT")?;
    Ok(())
}

fn add_item_pause_columns(conn: &Connection) -> Result<()> {
    add_column_if_missing(conn, "fridge_items", "paused", "INTEGER NOT NULL DEFAULT 0")?;
    add_column_if_missing(conn, "fridge_items", "paused_at", "TEXT")?;
    add_column_if_missing(conn, "fridge_items", "frozen_age", "TEXT")?;
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by `Store::open()`. Idempotent: a second run finds every marker
/// in place and does nothing.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for migration in MIGRATIONS {
        if migration_applied(conn, migration.id)? {
            continue;
        }
        (migration.apply)(conn)?;
        mark_applied(conn, migration.id, migration.description)?;
        success(format!("Migration applied: {}", migration.id));
    }

    Ok(())
}
