//! Display rows handed to the presentation layer on every refresh tick.
//! Views are derived on demand from the live entities and never persisted.

use crate::models::{TrackedItem, TrackedTicket};
use crate::utils::time::format_duration;
use chrono::{DateTime, Local};

/// One renderable line for a ticket.
///
/// Completion is rendered here as a `[Done @ ...]` title suffix; the stored
/// key never carries it. A completed ticket shows no countdown at all.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketView {
    pub title: String,
    pub created: String,
    pub countdown: Option<String>,
    pub description: String,
    pub overdue: bool,
    pub paused: bool,
    pub completed: bool,
}

impl TicketView {
    pub fn build(ticket: &TrackedTicket, now: DateTime<Local>) -> Self {
        let title = match ticket.completed_at.filter(|_| ticket.completed) {
            Some(done) => format!("{} [Done @ {}]", ticket.title, done.format("%H:%M:%S")),
            None => ticket.title.clone(),
        };
        let remaining = ticket.remaining(now);
        let countdown = if ticket.completed {
            None
        } else {
            Some(format_duration(remaining, true))
        };
        Self {
            title,
            created: ticket.created_at.format("%H:%M:%S").to_string(),
            countdown,
            description: ticket.description.clone(),
            overdue: !ticket.completed && remaining < chrono::Duration::zero(),
            paused: ticket.paused,
            completed: ticket.completed,
        }
    }

    pub fn line(&self) -> String {
        match &self.countdown {
            Some(countdown) => format!(
                "{} | Created: {} | Due in: {} | Desc: {}",
                self.title, self.created, countdown, self.description
            ),
            None => format!(
                "{} | Created: {} | Desc: {}",
                self.title, self.created, self.description
            ),
        }
    }
}

/// One renderable line for a fridge item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub name: String,
    pub added: String,
    pub age: String,
    pub paused: bool,
}

impl ItemView {
    pub fn build(item: &TrackedItem, now: DateTime<Local>) -> Self {
        Self {
            name: item.name.clone(),
            added: item.added_at.format("%H:%M:%S").to_string(),
            age: format_duration(item.age(now), false),
            paused: item.paused,
        }
    }

    pub fn line(&self) -> String {
        format!("{} | Added: {} | Age: {}", self.name, self.added, self.age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn active_ticket_renders_countdown() {
        let t = TrackedTicket::new(
            "Ticket #1".into(),
            "water plants".into(),
            t0(),
            Duration::minutes(5),
        );
        let view = TicketView::build(&t, t0() + Duration::minutes(1));
        assert_eq!(
            view.line(),
            "Ticket #1 | Created: 09:00:00 | Due in: 00:04:00 | Desc: water plants"
        );
        assert!(!view.overdue);
    }

    #[test]
    fn overdue_ticket_is_flagged_and_signed() {
        let t = TrackedTicket::new("Ticket #1".into(), "x".into(), t0(), Duration::minutes(5));
        let view = TicketView::build(&t, t0() + Duration::minutes(6));
        assert!(view.overdue);
        assert_eq!(view.countdown.as_deref(), Some("-00:01:00"));
    }

    #[test]
    fn completed_ticket_gets_suffix_and_no_countdown() {
        let mut t = TrackedTicket::new("Ticket #2".into(), "x".into(), t0(), Duration::minutes(5));
        t.complete(t0() + Duration::minutes(2));
        let view = TicketView::build(&t, t0() + Duration::hours(1));
        assert_eq!(view.title, "Ticket #2 [Done @ 09:02:00]");
        assert!(view.countdown.is_none());
        assert!(!view.overdue);
    }

    #[test]
    fn completion_suffix_hides_pause_state_changes() {
        let mut t = TrackedTicket::new("Ticket #3".into(), "x".into(), t0(), Duration::minutes(5));
        t.complete(t0());
        let before = TicketView::build(&t, t0() + Duration::minutes(10));
        t.toggle_pause(t0() + Duration::minutes(10));
        let after = TicketView::build(&t, t0() + Duration::minutes(10));
        // pause flag changes, the rendered line does not
        assert!(after.paused);
        assert_eq!(before.line(), after.line());
    }

    #[test]
    fn item_line_shows_age_with_days() {
        let item = TrackedItem::new("milk".into(), t0() - Duration::days(2));
        let view = ItemView::build(&item, t0() + Duration::hours(3));
        assert_eq!(view.line(), "milk | Added: 09:00:00 | Age: 2d 03:00:00");
    }
}
