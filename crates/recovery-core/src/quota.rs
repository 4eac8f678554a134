//! Daily free-start quota.
//!
//! Non-Pro users get a fixed number of routine starts per calendar day
//! (one by default). Pro users are never counted. The 30-minute slot is
//! Pro only regardless of the counter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::checkin::TimeSlot;

/// Default number of free starts per day.
pub const DEFAULT_FREE_DAILY_LIMIT: u32 = 1;

/// Per-day usage counter, persisted in the app state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FreeDaily {
    /// Calendar day this counter belongs to, as `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub used: u32,
}

impl FreeDaily {
    pub fn day_key(day: NaiveDate) -> String {
        day.format("%Y-%m-%d").to_string()
    }

    /// Reset the counter if it belongs to another day.
    pub fn roll_over(&mut self, today: NaiveDate) {
        let key = Self::day_key(today);
        if self.date != key {
            self.date = key;
            self.used = 0;
        }
    }

    /// Usage as seen on `today`, without mutating.
    pub fn used_on(&self, today: NaiveDate) -> u32 {
        if self.date == Self::day_key(today) {
            self.used
        } else {
            0
        }
    }
}

/// Gate decision for one start attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Admission {
    Granted,
    /// Free starts for today are used up.
    DailyLimitReached { used: u32, limit: u32 },
    /// The slot is reserved for Pro.
    ProOnly { slot: TimeSlot },
}

impl Admission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Admission::Granted)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QuotaGate {
    daily_limit: u32,
}

impl Default for QuotaGate {
    fn default() -> Self {
        Self {
            daily_limit: DEFAULT_FREE_DAILY_LIMIT,
        }
    }
}

impl QuotaGate {
    pub fn new(daily_limit: u32) -> Self {
        Self { daily_limit }
    }

    /// Decide whether a routine in `slot` may start now, and count the start
    /// if it is a free one. A denial leaves the counter untouched (apart from
    /// the day roll-over).
    pub fn admit(
        &self,
        usage: &mut FreeDaily,
        is_pro: bool,
        slot: TimeSlot,
        today: NaiveDate,
    ) -> Admission {
        if slot.requires_pro() && !is_pro {
            tracing::info!(slot = slot.minutes(), "start denied: slot requires pro");
            return Admission::ProOnly { slot };
        }

        usage.roll_over(today);

        if is_pro {
            return Admission::Granted;
        }

        if usage.used >= self.daily_limit {
            tracing::info!(used = usage.used, limit = self.daily_limit, "start denied: daily limit reached");
            return Admission::DailyLimitReached {
                used: usage.used,
                limit: self.daily_limit,
            };
        }

        usage.used += 1;
        Admission::Granted
    }

    /// Free starts left today; `None` means unlimited.
    pub fn remaining(&self, usage: &FreeDaily, is_pro: bool, today: NaiveDate) -> Option<u32> {
        if is_pro {
            None
        } else {
            Some(self.daily_limit.saturating_sub(usage.used_on(today)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn first_free_start_is_granted_and_counted() {
        let gate = QuotaGate::default();
        let mut usage = FreeDaily::default();
        assert_eq!(gate.admit(&mut usage, false, TimeSlot::Three, day(1)), Admission::Granted);
        assert_eq!(usage, FreeDaily { date: "2026-03-01".into(), used: 1 });
    }

    #[test]
    fn second_same_day_start_is_denied_without_counting() {
        let gate = QuotaGate::default();
        let mut usage = FreeDaily::default();
        gate.admit(&mut usage, false, TimeSlot::Three, day(1));
        let second = gate.admit(&mut usage, false, TimeSlot::Ten, day(1));
        assert_eq!(second, Admission::DailyLimitReached { used: 1, limit: 1 });
        let third = gate.admit(&mut usage, false, TimeSlot::Ten, day(1));
        assert!(!third.is_granted());
        assert_eq!(usage.used, 1);
    }

    #[test]
    fn new_day_resets_counter() {
        let gate = QuotaGate::default();
        let mut usage = FreeDaily { date: "2026-03-01".into(), used: 1 };
        assert_eq!(gate.remaining(&usage, false, day(2)), Some(1));
        assert!(gate.admit(&mut usage, false, TimeSlot::Three, day(2)).is_granted());
        assert_eq!(usage, FreeDaily { date: "2026-03-02".into(), used: 1 });
    }

    #[test]
    fn pro_is_never_counted() {
        let gate = QuotaGate::default();
        let mut usage = FreeDaily { date: "2026-03-01".into(), used: 1 };
        for _ in 0..5 {
            assert!(gate.admit(&mut usage, true, TimeSlot::Ten, day(1)).is_granted());
        }
        assert_eq!(usage.used, 1);
        assert_eq!(gate.remaining(&usage, true, day(1)), None);
    }

    #[test]
    fn thirty_minutes_requires_pro_even_with_quota_left() {
        let gate = QuotaGate::default();
        let mut usage = FreeDaily::default();
        assert_eq!(
            gate.admit(&mut usage, false, TimeSlot::Thirty, day(1)),
            Admission::ProOnly { slot: TimeSlot::Thirty }
        );
        assert_eq!(usage, FreeDaily::default());
        assert!(gate.admit(&mut usage, true, TimeSlot::Thirty, day(1)).is_granted());
    }

    #[test]
    fn configurable_limit() {
        let gate = QuotaGate::new(2);
        let mut usage = FreeDaily::default();
        assert!(gate.admit(&mut usage, false, TimeSlot::Three, day(1)).is_granted());
        assert_eq!(gate.remaining(&usage, false, day(1)), Some(1));
        assert!(gate.admit(&mut usage, false, TimeSlot::Three, day(1)).is_granted());
        assert!(!gate.admit(&mut usage, false, TimeSlot::Three, day(1)).is_granted());
    }
}
