use chrono::{DateTime, Duration, Local};

/// A fridge item whose age counts up from `added_at`.
///
/// Names may repeat, so the store key is the `(name, added_at)` pair. Pause
/// fields follow the same invariant shape as the ticket: `paused` ⇔ both
/// `paused_at` and `frozen_age` set. Resuming shifts `added_at` later by the
/// paused interval, so paused time is excluded from the age.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedItem {
    pub name: String,
    pub added_at: DateTime<Local>,
    pub paused: bool,
    pub paused_at: Option<DateTime<Local>>,
    pub frozen_age: Option<Duration>,
}

impl TrackedItem {
    pub fn new(name: String, added_at: DateTime<Local>) -> Self {
        Self {
            name,
            added_at,
            paused: false,
            paused_at: None,
            frozen_age: None,
        }
    }

    /// Elapsed age. Frozen while paused; non-negative by construction since
    /// `added_at` never exceeds `now`.
    pub fn age(&self, now: DateTime<Local>) -> Duration {
        if self.paused {
            self.frozen_age.unwrap_or(now - self.added_at)
        } else {
            now - self.added_at
        }
    }

    pub fn toggle_pause(&mut self, now: DateTime<Local>) {
        if self.paused {
            if let Some(paused_at) = self.paused_at {
                self.added_at += now - paused_at;
            }
            self.paused = false;
            self.paused_at = None;
            self.frozen_age = None;
        } else {
            self.frozen_age = Some(now - self.added_at);
            self.paused_at = Some(now);
            self.paused = true;
        }
    }

    pub fn pause_state_consistent(&self) -> bool {
        self.paused == (self.paused_at.is_some() && self.frozen_age.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 9, 1, 18, 0, 0).unwrap()
    }

    #[test]
    fn age_counts_up() {
        let item = TrackedItem::new("milk".into(), t0());
        assert_eq!(item.age(t0()), Duration::zero());
        assert_eq!(item.age(t0() + Duration::hours(30)), Duration::hours(30));
    }

    #[test]
    fn backdated_item_starts_with_positive_age() {
        let item = TrackedItem::new("leftovers".into(), t0() - Duration::days(2));
        assert_eq!(item.age(t0()), Duration::days(2));
    }

    #[test]
    fn pause_freezes_age() {
        let mut item = TrackedItem::new("milk".into(), t0());
        item.toggle_pause(t0() + Duration::hours(1));
        assert!(item.pause_state_consistent());
        assert_eq!(item.age(t0() + Duration::hours(1)), Duration::hours(1));
        assert_eq!(item.age(t0() + Duration::days(4)), Duration::hours(1));
    }

    // Pause at t0, resume 3 minutes later: the age is still zero.
    #[test]
    fn paused_minutes_are_excluded_from_age() {
        let mut item = TrackedItem::new("milk".into(), t0());
        item.toggle_pause(t0());
        item.toggle_pause(t0() + Duration::minutes(3));
        assert!(item.pause_state_consistent());
        assert_eq!(item.age(t0() + Duration::minutes(3)), Duration::zero());
    }

    #[test]
    fn repeated_cycles_accumulate_only_active_time() {
        let mut item = TrackedItem::new("cheese".into(), t0());
        let mut now = t0();
        for _ in 0..3 {
            now += Duration::minutes(10); // active
            item.toggle_pause(now);
            now += Duration::hours(2); // paused
            item.toggle_pause(now);
        }
        assert_eq!(item.age(now), Duration::minutes(30));
    }
}
