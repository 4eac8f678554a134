//! Rolling-window summary of session history.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::routine::Situation;
use crate::session::Session;

/// Default report window in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// How many routines the report lists.
pub const TOP_ROUTINES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineSummary {
    pub routine_id: String,
    pub routine_title: String,
    pub count: usize,
    pub avg_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub session_count: usize,
    pub avg_delta: f64,
    pub top_routines: Vec<RoutineSummary>,
    pub top_situation: Option<Situation>,
}

fn mean(sum: i64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Summarise the sessions with `now - ts < window`.
pub fn weekly_report(sessions: &[Session], now: DateTime<Utc>, window: Duration) -> WeeklyReport {
    let recent: Vec<&Session> = sessions.iter().filter(|s| now - s.ts < window).collect();

    let delta_sum: i64 = recent.iter().map(|s| s.delta as i64).sum();

    // (id, title, count, delta sum) in first-seen order
    let mut per_routine: Vec<(&str, &str, usize, i64)> = Vec::new();
    let mut per_situation: Vec<(Situation, usize)> = Vec::new();

    for s in &recent {
        match per_routine.iter_mut().find(|(id, ..)| *id == s.routine_id) {
            Some(entry) => {
                entry.2 += 1;
                entry.3 += s.delta as i64;
            }
            None => per_routine.push((s.routine_id.as_str(), s.routine_title.as_str(), 1, s.delta as i64)),
        }
        match per_situation.iter_mut().find(|(sit, _)| *sit == s.situation) {
            Some(entry) => entry.1 += 1,
            None => per_situation.push((s.situation, 1)),
        }
    }

    let mut top_routines: Vec<RoutineSummary> = per_routine
        .into_iter()
        .map(|(id, title, count, sum)| RoutineSummary {
            routine_id: id.to_string(),
            routine_title: title.to_string(),
            count,
            avg_delta: mean(sum, count),
        })
        .collect();
    top_routines.sort_by(|a, b| b.avg_delta.total_cmp(&a.avg_delta));
    top_routines.truncate(TOP_ROUTINES);

    // First strictly greater count wins, so ties keep the earliest.
    let top_situation = per_situation
        .iter()
        .fold(None::<(Situation, usize)>, |best, &(sit, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((sit, n)),
        })
        .map(|(sit, _)| sit);

    WeeklyReport {
        session_count: recent.len(),
        avg_delta: mean(delta_sum, recent.len()),
        top_routines,
        top_situation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkin::CheckIn;
    use crate::routine::RecoveryType;
    use crate::session::HelpfulTag;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    fn session(routine_id: &str, situation: Situation, delta: i8, age: Duration) -> Session {
        let before = 3u8;
        Session {
            id: format!("S_{routine_id}"),
            ts: now() - age,
            routine_id: routine_id.to_string(),
            routine_title: format!("Title {routine_id}"),
            situation,
            duration_min: 3,
            recovery_type: RecoveryType::Cognitive,
            checkin: CheckIn::default(),
            before,
            after: (before as i8 + delta) as u8,
            delta,
            helpful_tag: HelpfulTag::Breathing,
        }
    }

    fn week() -> Duration {
        Duration::days(DEFAULT_WINDOW_DAYS)
    }

    #[test]
    fn empty_history() {
        let r = weekly_report(&[], now(), week());
        assert_eq!(r.session_count, 0);
        assert_eq!(r.avg_delta, 0.0);
        assert!(r.top_routines.is_empty());
        assert_eq!(r.top_situation, None);
    }

    #[test]
    fn window_excludes_old_sessions() {
        let sessions = vec![
            session("A", Situation::Stuck, 2, Duration::hours(1)),
            session("B", Situation::Stuck, 4, Duration::days(8)),
        ];
        let r = weekly_report(&sessions, now(), week());
        assert_eq!(r.session_count, 1);
        assert_eq!(r.avg_delta, 2.0);
        assert_eq!(r.top_routines[0].routine_id, "A");
    }

    #[test]
    fn exactly_window_old_is_excluded() {
        let sessions = vec![session("A", Situation::Stuck, 2, Duration::days(7))];
        assert_eq!(weekly_report(&sessions, now(), week()).session_count, 0);
    }

    #[test]
    fn top_routines_sorted_by_average_delta_stable() {
        let h = Duration::hours(1);
        let sessions = vec![
            session("A", Situation::Stuck, 1, h),
            session("B", Situation::MeetingPre, 3, h),
            session("C", Situation::MeetingPre, 1, h),
            session("A", Situation::Stuck, 3, h),
            session("D", Situation::BeforeLeave, -1, h),
        ];
        let r = weekly_report(&sessions, now(), week());
        let ids: Vec<&str> = r.top_routines.iter().map(|t| t.routine_id.as_str()).collect();
        // B=3, A=2, C=1, D=-1
        assert_eq!(ids, vec!["B", "A", "C"]);
        assert_eq!(r.top_routines[1].count, 2);
        assert_eq!(r.top_routines[1].routine_title, "Title A");
        assert_eq!(r.session_count, 5);
        assert!((r.avg_delta - 1.4).abs() < 1e-9);
    }

    #[test]
    fn equal_averages_keep_first_seen_order() {
        let h = Duration::hours(1);
        let sessions = vec![
            session("X", Situation::Stuck, 2, h),
            session("Y", Situation::Stuck, 2, h),
        ];
        let r = weekly_report(&sessions, now(), week());
        assert_eq!(r.top_routines[0].routine_id, "X");
        assert_eq!(r.top_routines[1].routine_id, "Y");
    }

    #[test]
    fn top_situation_ties_go_to_first_encountered() {
        let h = Duration::hours(1);
        let sessions = vec![
            session("A", Situation::BeforeLeave, 0, h),
            session("B", Situation::Stuck, 0, h),
            session("C", Situation::Stuck, 0, h),
            session("D", Situation::BeforeLeave, 0, h),
        ];
        let r = weekly_report(&sessions, now(), week());
        assert_eq!(r.top_situation, Some(Situation::BeforeLeave));
    }
}
