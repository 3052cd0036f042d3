//! Coordinator owning the in-memory collections and the active store.
//!
//! All mutations follow write-then-apply ordering: the store write happens
//! first and the in-memory state changes only after it succeeds, so a failed
//! write leaves memory untouched and the error goes back to the caller.

use crate::config::Config;
use crate::db::{self, Store};
use crate::errors::AppResult;
use crate::models::{ItemView, TicketView, TrackedItem, TrackedTicket};
use chrono::{DateTime, Duration, Local};
use std::path::Path;

pub struct Tracker {
    config: Config,
    store: Store,
    tickets: Vec<TrackedTicket>,
    items: Vec<TrackedItem>,
}

impl Tracker {
    /// Opens the configured store (creating it when missing) and loads both
    /// collections.
    pub fn open(config: Config) -> AppResult<Self> {
        let store = Store::open(Path::new(&config.database))?;
        let tickets = db::load_tickets(&store.conn)?;
        let items = db::load_items(&store.conn)?;
        Ok(Self {
            config,
            store,
            tickets,
            items,
        })
    }

    /// Live tickets, most recently created first.
    pub fn tickets(&self) -> &[TrackedTicket] {
        &self.tickets
    }

    pub fn items(&self) -> &[TrackedItem] {
        &self.items
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    /// Deduplicated ticket descriptions, in display order. The presentation
    /// layer feeds its suggestion list from this.
    pub fn description_history(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for t in &self.tickets {
            if !seen.contains(&t.description) {
                seen.push(t.description.clone());
            }
        }
        seen
    }

    // ---------------------------------------------------------------
    // Ticket operations
    // ---------------------------------------------------------------

    /// Creates a ticket due `due_offset` from now. A blank description takes
    /// the configured placeholder. Titles are numbered by the count of live
    /// tickets, so a number can be reused after a deletion — preserved
    /// behavior, pinned by a test, pending a product decision.
    pub fn add_ticket(&mut self, description: &str, due_offset: Duration) -> AppResult<&TrackedTicket> {
        let description = match description.trim() {
            "" => self.config.blank_description.clone(),
            d => d.to_string(),
        };
        let title = format!("Ticket #{}", self.tickets.len() + 1);
        let ticket = TrackedTicket::new(title, description, Local::now(), due_offset);
        db::insert_ticket(&self.store.conn, &ticket)?;
        self.tickets.insert(0, ticket);
        Ok(&self.tickets[0])
    }

    /// Creates a ticket with the configured default due offset.
    pub fn add_ticket_with_default_due(&mut self, description: &str) -> AppResult<&TrackedTicket> {
        let offset = self.config.default_due_offset();
        self.add_ticket(description, offset)
    }

    /// Marks a ticket done. Already-completed tickets and unknown titles are
    /// both silent no-ops.
    pub fn complete_ticket(&mut self, title: &str) -> AppResult<()> {
        let Some(idx) = self.tickets.iter().position(|t| t.title == title) else {
            return Ok(());
        };
        if self.tickets[idx].completed {
            return Ok(());
        }
        let mut updated = self.tickets[idx].clone();
        updated.complete(Local::now());
        db::update_ticket_completion(&self.store.conn, &updated)?;
        self.tickets[idx] = updated;
        Ok(())
    }

    pub fn toggle_ticket_pause(&mut self, title: &str) -> AppResult<()> {
        let Some(idx) = self.tickets.iter().position(|t| t.title == title) else {
            return Ok(());
        };
        let mut updated = self.tickets[idx].clone();
        updated.toggle_pause(Local::now());
        db::update_ticket_pause(&self.store.conn, &updated)?;
        self.tickets[idx] = updated;
        Ok(())
    }

    pub fn delete_ticket(&mut self, title: &str) -> AppResult<()> {
        let removed = db::delete_ticket(&self.store.conn, title)?;
        if removed > 0 {
            // best-effort: a failed log line must not undo a committed delete
            db::record_operation(&self.store.conn, "delete_ticket", title, "Ticket removed").ok();
        }
        self.tickets.retain(|t| t.title != title);
        Ok(())
    }

    // ---------------------------------------------------------------
    // Fridge-item operations
    // ---------------------------------------------------------------

    /// Creates an item aged `age_offset` at birth (backdating). A blank name
    /// is rejected: nothing is created and `None` tells the caller so.
    pub fn add_item(&mut self, name: &str, age_offset: Duration) -> AppResult<Option<&TrackedItem>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let item = TrackedItem::new(name.to_string(), Local::now() - age_offset);
        db::insert_item(&self.store.conn, &item)?;
        self.items.push(item);
        Ok(self.items.last())
    }

    pub fn toggle_item_pause(&mut self, name: &str, added_at: DateTime<Local>) -> AppResult<()> {
        let Some(idx) = self
            .items
            .iter()
            .position(|i| i.name == name && i.added_at == added_at)
        else {
            return Ok(());
        };
        let mut updated = self.items[idx].clone();
        let previous_added_at = updated.added_at;
        updated.toggle_pause(Local::now());
        db::update_item_pause(&self.store.conn, &updated, previous_added_at)?;
        self.items[idx] = updated;
        Ok(())
    }

    pub fn delete_item(&mut self, name: &str, added_at: DateTime<Local>) -> AppResult<()> {
        let removed = db::delete_item(&self.store.conn, name, added_at)?;
        if removed > 0 {
            db::record_operation(&self.store.conn, "delete_item", name, "Fridge item removed").ok();
        }
        self.items
            .retain(|i| !(i.name == name && i.added_at == added_at));
        Ok(())
    }

    // ---------------------------------------------------------------
    // Refresh and store switching
    // ---------------------------------------------------------------

    /// Recomputes the display rows. Read-only: touches neither the entities
    /// nor the store, so the refresh tick can call it every period.
    pub fn refresh(&self, now: DateTime<Local>) -> (Vec<TicketView>, Vec<ItemView>) {
        let tickets = self
            .tickets
            .iter()
            .map(|t| TicketView::build(t, now))
            .collect();
        let items = self.items.iter().map(|i| ItemView::build(i, now)).collect();
        (tickets, items)
    }

    /// Activates a different store. The new store is opened and fully loaded
    /// before anything is replaced, then connection and both collections
    /// swap together — a failure leaves the current store active and there
    /// is no window where old and new entities mix. The previous connection
    /// closes on drop; store writes are synchronous, so none can be in
    /// flight here.
    pub fn switch_store(&mut self, path: &Path) -> AppResult<()> {
        let store = Store::open(path)?;
        let tickets = db::load_tickets(&store.conn)?;
        let items = db::load_items(&store.conn)?;
        db::record_operation(
            &store.conn,
            "switch_store",
            &path.to_string_lossy(),
            "Store activated",
        )?;
        self.config.database = path.to_string_lossy().to_string();
        self.store = store;
        self.tickets = tickets;
        self.items = items;
        Ok(())
    }
}
