//! Keyed CRUD and defensive row decoding.
//!
//! Decoding is total: a malformed timestamp takes the current-time fallback
//! with a console warning, NULL extension columns (rows written before the
//! corresponding migration) decode to their defaults, and a pause flag
//! whose companion fields are missing is demoted to unpaused. No row is
//! ever dropped and no single bad row fails a load.

use crate::errors::AppResult;
use crate::models::{TrackedItem, TrackedTicket};
use crate::ui::messages::warning;
use crate::utils::time::{MISSING_TIMESTAMP, format_timestamp, try_parse_timestamp};
use chrono::{DateTime, Duration, Local};
use rusqlite::{Connection, Result, Row, params};

// ---------------------------------------------------------------
// Inserts (full state, single statement, atomic)
// ---------------------------------------------------------------

pub fn insert_ticket(conn: &Connection, t: &TrackedTicket) -> AppResult<()> {
    conn.execute(
        "INSERT INTO tickets
         (title, description, created_at, due_at,
          completed, completed_at, paused, paused_at, frozen_remaining)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            t.title,
            t.description,
            format_timestamp(&t.created_at),
            format_timestamp(&t.due_at),
            t.completed as i32,
            t.completed_at.as_ref().map(format_timestamp),
            t.paused as i32,
            t.paused_at.as_ref().map(format_timestamp),
            t.frozen_remaining.map(|d| d.num_seconds().to_string()),
        ],
    )?;
    Ok(())
}

pub fn insert_item(conn: &Connection, item: &TrackedItem) -> AppResult<()> {
    conn.execute(
        "INSERT INTO fridge_items (name, added_at, paused, paused_at, frozen_age)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            item.name,
            format_timestamp(&item.added_at),
            item.paused as i32,
            item.paused_at.as_ref().map(format_timestamp),
            item.frozen_age.map(|d| d.num_seconds().to_string()),
        ],
    )?;
    Ok(())
}

// ---------------------------------------------------------------
// Partial updates, keyed by natural key
// ---------------------------------------------------------------

/// `due_at` moves together with the pause state on resume, so it belongs to
/// this update; everything else stays untouched.
pub fn update_ticket_pause(conn: &Connection, t: &TrackedTicket) -> AppResult<()> {
    conn.execute(
        "UPDATE tickets
         SET due_at = ?1, paused = ?2, paused_at = ?3, frozen_remaining = ?4
         WHERE title = ?5",
        params![
            format_timestamp(&t.due_at),
            t.paused as i32,
            t.paused_at.as_ref().map(format_timestamp),
            t.frozen_remaining.map(|d| d.num_seconds().to_string()),
            t.title,
        ],
    )?;
    Ok(())
}

pub fn update_ticket_completion(conn: &Connection, t: &TrackedTicket) -> AppResult<()> {
    conn.execute(
        "UPDATE tickets SET completed = ?1, completed_at = ?2 WHERE title = ?3",
        params![
            t.completed as i32,
            t.completed_at.as_ref().map(format_timestamp),
            t.title,
        ],
    )?;
    Ok(())
}

/// `added_at` is both part of the key and mutated on resume, so the caller
/// passes the pre-mutation value to address the row.
pub fn update_item_pause(
    conn: &Connection,
    item: &TrackedItem,
    previous_added_at: DateTime<Local>,
) -> AppResult<()> {
    conn.execute(
        "UPDATE fridge_items
         SET added_at = ?1, paused = ?2, paused_at = ?3, frozen_age = ?4
         WHERE name = ?5 AND added_at = ?6",
        params![
            format_timestamp(&item.added_at),
            item.paused as i32,
            item.paused_at.as_ref().map(format_timestamp),
            item.frozen_age.map(|d| d.num_seconds().to_string()),
            item.name,
            format_timestamp(&previous_added_at),
        ],
    )?;
    Ok(())
}

// ---------------------------------------------------------------
// Deletes (missing key is a silent no-op)
// ---------------------------------------------------------------

/// Returns the number of rows removed; zero is not an error.
pub fn delete_ticket(conn: &Connection, title: &str) -> AppResult<usize> {
    let removed = conn.execute("DELETE FROM tickets WHERE title = ?1", [title])?;
    Ok(removed)
}

pub fn delete_item(
    conn: &Connection,
    name: &str,
    added_at: DateTime<Local>,
) -> AppResult<usize> {
    let removed = conn.execute(
        "DELETE FROM fridge_items WHERE name = ?1 AND added_at = ?2",
        params![name, format_timestamp(&added_at)],
    )?;
    Ok(removed)
}

// ---------------------------------------------------------------
// Loads
// ---------------------------------------------------------------

pub fn load_tickets(conn: &Connection) -> AppResult<Vec<TrackedTicket>> {
    let mut stmt = conn.prepare(
        "SELECT title, description, created_at, due_at,
                completed, completed_at, paused, paused_at, frozen_remaining
         FROM tickets",
    )?;
    let rows = stmt.query_map([], map_ticket_row)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    // most recent first, ordered on the decoded instants: the stored text
    // carries a UTC offset, so rows straddling an offset change do not sort
    // lexicographically
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(out)
}

pub fn load_items(conn: &Connection) -> AppResult<Vec<TrackedItem>> {
    let mut stmt = conn.prepare(
        "SELECT name, added_at, paused, paused_at, frozen_age FROM fridge_items",
    )?;
    let rows = stmt.query_map([], map_item_row)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn map_ticket_row(row: &Row) -> Result<TrackedTicket> {
    let now = Local::now();
    let title: String = row.get("title")?;
    let description: String = row.get::<_, Option<String>>("description")?.unwrap_or_default();

    let created_at = required_timestamp(row.get("created_at")?, "created_at", &title, now);
    let due_at = required_timestamp(row.get("due_at")?, "due_at", &title, now);

    let completed = row.get::<_, Option<i64>>("completed")?.unwrap_or(0) != 0;
    let completed_at = optional_timestamp(row.get("completed_at")?, "completed_at", &title, now);

    let (paused, paused_at, frozen_remaining) = decode_pause_fields(
        row.get::<_, Option<i64>>("paused")?,
        row.get("paused_at")?,
        row.get("frozen_remaining")?,
        &title,
    );

    Ok(TrackedTicket {
        title,
        description,
        created_at,
        due_at,
        completed,
        completed_at,
        paused,
        paused_at,
        frozen_remaining,
    })
}

fn map_item_row(row: &Row) -> Result<TrackedItem> {
    let now = Local::now();
    let name: String = row.get("name")?;
    let added_at = required_timestamp(row.get("added_at")?, "added_at", &name, now);

    let (paused, paused_at, frozen_age) = decode_pause_fields(
        row.get::<_, Option<i64>>("paused")?,
        row.get("paused_at")?,
        row.get("frozen_age")?,
        &name,
    );

    Ok(TrackedItem {
        name,
        added_at,
        paused,
        paused_at,
        frozen_age,
    })
}

/// Mandatory timestamp column: unreadable text falls back to `now` with a
/// warning, NULL falls back silently (pre-migration row shape).
fn required_timestamp(
    raw: Option<String>,
    column: &str,
    key: &str,
    fallback: DateTime<Local>,
) -> DateTime<Local> {
    match raw {
        Some(text) => match try_parse_timestamp(&text) {
            Some(ts) => ts,
            None => {
                if !text.trim().is_empty() && text.trim() != MISSING_TIMESTAMP {
                    warning(format!(
                        "Unreadable {} for '{}' ({:?}), substituting current time",
                        column, key, text
                    ));
                }
                fallback
            }
        },
        None => fallback,
    }
}

/// Nullable timestamp column: NULL stays `None`, anything else is parsed
/// with the same fallback contract.
fn optional_timestamp(
    raw: Option<String>,
    column: &str,
    key: &str,
    fallback: DateTime<Local>,
) -> Option<DateTime<Local>> {
    raw.map(|text| required_timestamp(Some(text), column, key, fallback))
}

/// Decode the pause triple, repairing invariant violations: the flag only
/// survives when both companion fields decode, otherwise the row loads as
/// unpaused.
fn decode_pause_fields(
    flag: Option<i64>,
    paused_at_raw: Option<String>,
    frozen_raw: Option<String>,
    key: &str,
) -> (bool, Option<DateTime<Local>>, Option<Duration>) {
    let flagged = flag.unwrap_or(0) != 0;
    if !flagged {
        return (false, None, None);
    }
    let paused_at = paused_at_raw.as_deref().and_then(try_parse_timestamp);
    let frozen = frozen_raw
        .as_deref()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .map(Duration::seconds);
    match (paused_at, frozen) {
        (Some(at), Some(frozen)) => (true, Some(at), Some(frozen)),
        _ => {
            warning(format!(
                "Incomplete pause state for '{}' at load, resuming it",
                key
            ));
            (false, None, None)
        }
    }
}
