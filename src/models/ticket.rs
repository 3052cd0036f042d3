use chrono::{DateTime, Duration, Local};

/// A work ticket counting down to its due time.
///
/// `title` is the store's natural key and never changes after creation;
/// completion is carried by `completed`/`completed_at` and only rendered as
/// a suffix at the presentation boundary.
///
/// Invariant: `paused == true` ⇔ `paused_at` and `frozen_remaining` are both
/// set. Resuming shifts `due_at` forward by exactly the paused interval, so
/// the total active countdown time is invariant across pause cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedTicket {
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Local>,
    pub due_at: DateTime<Local>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Local>>,
    pub paused: bool,
    pub paused_at: Option<DateTime<Local>>,
    pub frozen_remaining: Option<Duration>,
}

impl TrackedTicket {
    /// `due_offset` is non-negative; `due_at = now + due_offset`.
    pub fn new(
        title: String,
        description: String,
        now: DateTime<Local>,
        due_offset: Duration,
    ) -> Self {
        Self {
            title,
            description,
            created_at: now,
            due_at: now + due_offset,
            completed: false,
            completed_at: None,
            paused: false,
            paused_at: None,
            frozen_remaining: None,
        }
    }

    /// Remaining time until due. Frozen while paused; negative once overdue
    /// (a displayable state, not an error).
    pub fn remaining(&self, now: DateTime<Local>) -> Duration {
        if self.paused {
            self.frozen_remaining.unwrap_or(self.due_at - now)
        } else {
            self.due_at - now
        }
    }

    /// Marks the ticket done. No-op when already completed: `completed_at`
    /// is set exactly once.
    pub fn complete(&mut self, now: DateTime<Local>) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.completed_at = Some(now);
    }

    /// Pause freezes the remaining time at `now`; resume shifts `due_at` by
    /// the elapsed pause interval and clears the frozen state. Permitted on
    /// completed tickets, where it has no visible effect.
    pub fn toggle_pause(&mut self, now: DateTime<Local>) {
        if self.paused {
            if let Some(paused_at) = self.paused_at {
                self.due_at += now - paused_at;
            }
            self.paused = false;
            self.paused_at = None;
            self.frozen_remaining = None;
        } else {
            self.frozen_remaining = Some(self.due_at - now);
            self.paused_at = Some(now);
            self.paused = true;
        }
    }

    /// `paused` ⇔ both pause fields present.
    pub fn pause_state_consistent(&self) -> bool {
        self.paused == (self.paused_at.is_some() && self.frozen_remaining.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap()
    }

    fn ticket() -> TrackedTicket {
        TrackedTicket::new(
            "Ticket #1".into(),
            "write report".into(),
            t0(),
            Duration::minutes(5),
        )
    }

    #[test]
    fn remaining_counts_down_and_goes_negative() {
        let t = ticket();
        assert_eq!(t.remaining(t0()), Duration::minutes(5));
        assert_eq!(t.remaining(t0() + Duration::minutes(2)), Duration::minutes(3));
        assert_eq!(
            t.remaining(t0() + Duration::minutes(7)),
            Duration::minutes(-2)
        );
    }

    #[test]
    fn pause_freezes_remaining_regardless_of_now() {
        let mut t = ticket();
        t.toggle_pause(t0() + Duration::minutes(1));
        assert!(t.pause_state_consistent());
        assert_eq!(t.remaining(t0() + Duration::minutes(1)), Duration::minutes(4));
        assert_eq!(t.remaining(t0() + Duration::hours(6)), Duration::minutes(4));
    }

    // Pause for 2 minutes; the countdown resumes where it stopped.
    #[test]
    fn paused_interval_is_excluded_from_countdown() {
        let mut t = ticket();
        t.toggle_pause(t0());
        t.toggle_pause(t0() + Duration::minutes(2));
        assert!(t.pause_state_consistent());
        assert_eq!(t.remaining(t0() + Duration::minutes(2)), Duration::minutes(5));
    }

    #[test]
    fn immediate_resume_leaves_due_at_unchanged() {
        let mut t = ticket();
        let due = t.due_at;
        t.toggle_pause(t0() + Duration::seconds(30));
        t.toggle_pause(t0() + Duration::seconds(30));
        assert_eq!(t.due_at, due);
        assert!(!t.paused);
    }

    // Conservation law: after N pause cycles the countdown has consumed the
    // original offset minus the total paused time.
    #[test]
    fn active_countdown_is_conserved_across_cycles() {
        let mut t = ticket();
        let mut now = t0();
        let mut total_paused = Duration::zero();
        for pause_minutes in [1, 3, 2] {
            now += Duration::seconds(20);
            t.toggle_pause(now);
            now += Duration::minutes(pause_minutes);
            t.toggle_pause(now);
            total_paused += Duration::minutes(pause_minutes);
        }
        let active_elapsed = (now - t0()) - total_paused;
        assert_eq!(t.remaining(now), Duration::minutes(5) - active_elapsed);
    }

    #[test]
    fn complete_is_idempotent() {
        let mut t = ticket();
        t.complete(t0() + Duration::minutes(1));
        let first = t.completed_at;
        t.complete(t0() + Duration::minutes(4));
        assert!(t.completed);
        assert_eq!(t.completed_at, first);
    }

    #[test]
    fn pause_toggle_on_completed_ticket_is_permitted() {
        let mut t = ticket();
        t.complete(t0());
        t.toggle_pause(t0() + Duration::minutes(1));
        assert!(t.pause_state_consistent());
        t.toggle_pause(t0() + Duration::minutes(2));
        assert!(t.pause_state_consistent());
    }
}
