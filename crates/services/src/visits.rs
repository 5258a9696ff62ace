//! # Visit tracking
//!
//! The rolling per-session visit counter. State is passed in and out
//! explicitly; the caller decides where it lives (the session store) and
//! when it is written back.
//!
//! Policy: the counter advances once per calendar-day boundary. A request
//! less than a full day after the recorded visit leaves both fields
//! untouched.

use chrono::NaiveDateTime;

/// Wire format of the `last_visit` session value.
pub const LAST_VISIT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The session's visit counter and the timestamp it last advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitState {
    /// Always at least 1 once a session has been seen.
    pub visits: u32,
    pub last_visit: NaiveDateTime,
}

impl VisitState {
    /// Textual encodings for the session store.
    pub fn encode(&self) -> (String, String) {
        (
            self.visits.to_string(),
            self.last_visit.format(LAST_VISIT_FORMAT).to_string(),
        )
    }
}

/// Parses a stored `last_visit` value.
///
/// The original cookies carried a fractional-seconds suffix after the
/// 19-character timestamp; anything past that point is discarded. Returns
/// None for values that still do not parse.
pub fn parse_last_visit(raw: &str) -> Option<NaiveDateTime> {
    let head = raw.get(..19).unwrap_or(raw);
    NaiveDateTime::parse_from_str(head, LAST_VISIT_FORMAT).ok()
}

/// Computes the updated visit state for one tracked request.
///
/// Absent or malformed inputs fall back to defaults (count 1, last visit
/// now) rather than failing. The count is bumped by exactly one when more
/// than zero whole days have elapsed since the recorded visit; otherwise
/// the stored pair is returned unchanged.
pub fn track_visit(
    visits: Option<&str>,
    last_visit: Option<&str>,
    now: NaiveDateTime,
) -> VisitState {
    let count = visits
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(1)
        .max(1);

    match last_visit.and_then(parse_last_visit) {
        Some(last) if (now - last).num_days() > 0 => VisitState {
            visits: count.saturating_add(1),
            last_visit: now,
        },
        Some(last) => VisitState {
            visits: count,
            last_visit: last,
        },
        // First contact, or an unreadable timestamp: start the clock here.
        None => VisitState {
            visits: count,
            last_visit: now,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn first_contact_counts_one() {
        let now = at(2024, 3, 1, 12);
        let state = track_visit(None, None, now);
        assert_eq!(state.visits, 1);
        assert_eq!(state.last_visit, now);
    }

    #[test]
    fn same_day_leaves_state_untouched() {
        let last = at(2024, 3, 1, 8);
        let now = at(2024, 3, 1, 20);
        let (visits, last_raw) = VisitState { visits: 4, last_visit: last }.encode();
        let state = track_visit(Some(&visits), Some(&last_raw), now);
        assert_eq!(state.visits, 4);
        assert_eq!(state.last_visit, last);
    }

    #[test]
    fn day_boundary_increments_exactly_once() {
        let last = at(2024, 3, 1, 8);
        let now = at(2024, 3, 3, 8);
        let (visits, last_raw) = VisitState { visits: 4, last_visit: last }.encode();

        let bumped = track_visit(Some(&visits), Some(&last_raw), now);
        assert_eq!(bumped.visits, 5);
        assert_eq!(bumped.last_visit, now);

        // A follow-up request inside the same interval must not batch
        // further increments.
        let (visits, last_raw) = bumped.encode();
        let again = track_visit(Some(&visits), Some(&last_raw), now + Duration::hours(2));
        assert_eq!(again.visits, 5);
    }

    #[test]
    fn under_a_day_is_not_a_boundary() {
        let last = at(2024, 3, 1, 8);
        let now = last + Duration::hours(23);
        let (visits, last_raw) = VisitState { visits: 2, last_visit: last }.encode();
        let state = track_visit(Some(&visits), Some(&last_raw), now);
        assert_eq!(state.visits, 2);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let now = at(2024, 3, 1, 12);
        let state = track_visit(Some("many"), Some("not a timestamp"), now);
        assert_eq!(state.visits, 1);
        assert_eq!(state.last_visit, now);
    }

    #[test]
    fn fractional_suffix_is_discarded() {
        let parsed = parse_last_visit("2024-03-01 08:30:00.123456").unwrap();
        assert_eq!(parsed, at(2024, 3, 1, 8) + Duration::minutes(30));
    }

    #[test]
    fn zero_count_is_clamped_to_one() {
        let now = at(2024, 3, 1, 12);
        let state = track_visit(Some("0"), None, now);
        assert_eq!(state.visits, 1);
    }
}
