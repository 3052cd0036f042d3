//! ticktrack library root.
//! Tracks two kinds of time-bound records — tickets counting down to a due
//! time and fridge items counting up from an origin — with pause/resume
//! semantics, persisted in a self-migrating SQLite store.
//!
//! The presentation layer (whatever renders the rows) only talks to
//! [`core::Tracker`] and drives its redraws from [`ticker::Ticker`].

pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ticker;
pub mod ui;
pub mod utils;

pub use crate::core::Tracker;
pub use crate::errors::{AppError, AppResult};
