//! Pure schedule selection: next/previous events around a reference instant.

use chrono::NaiveDateTime;

use super::model::PrayerEvent;

/// The events bracketing a reference instant in an ascending schedule.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Neighbors {
    /// First event strictly after the reference instant.
    pub next: Option<PrayerEvent>,
    /// Last event at or before the reference instant.
    pub previous: Option<PrayerEvent>,
}

/// Single linear scan over a schedule sorted ascending by time.
///
/// Returns `(None, None)` for an empty schedule. The two results are adjacent
/// in the sequence whenever both are present.
pub fn select_neighbors(schedule: &[PrayerEvent], now: NaiveDateTime) -> Neighbors {
    let mut previous = None;
    for event in schedule {
        if event.time > now {
            return Neighbors {
                next: Some(event.clone()),
                previous,
            };
        }
        previous = Some(event.clone());
    }
    Neighbors {
        next: None,
        previous,
    }
}

/// Elapsed fraction of the span from `previous` to `next` at `now`, clamped
/// to [0, 1]. A non-positive span yields 0.
pub fn progress_fraction(previous: NaiveDateTime, next: NaiveDateTime, now: NaiveDateTime) -> f64 {
    let total = (next - previous).num_seconds();
    if total <= 0 {
        return 0.0;
    }
    let passed = (now - previous).num_seconds();
    (passed as f64 / total as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn event(name: &str, hour: u32, minute: u32) -> PrayerEvent {
        PrayerEvent {
            name: name.to_string(),
            time: at(hour, minute),
        }
    }

    fn sample_schedule() -> Vec<PrayerEvent> {
        vec![
            event("Fajr", 5, 0),
            event("Dhuhr", 12, 0),
            event("Asr", 15, 30),
        ]
    }

    #[test]
    fn test_midday_selects_adjacent_pair() {
        let neighbors = select_neighbors(&sample_schedule(), at(13, 0));
        assert_eq!(neighbors.next, Some(event("Asr", 15, 30)));
        assert_eq!(neighbors.previous, Some(event("Dhuhr", 12, 0)));
    }

    #[test]
    fn test_before_first_event_has_no_previous() {
        let neighbors = select_neighbors(&sample_schedule(), at(4, 0));
        assert_eq!(neighbors.next, Some(event("Fajr", 5, 0)));
        assert_eq!(neighbors.previous, None);
    }

    #[test]
    fn test_after_last_event_has_no_next() {
        let neighbors = select_neighbors(&sample_schedule(), at(22, 0));
        assert_eq!(neighbors.next, None);
        assert_eq!(neighbors.previous, Some(event("Asr", 15, 30)));
    }

    #[test]
    fn test_event_exactly_at_now_counts_as_previous() {
        let neighbors = select_neighbors(&sample_schedule(), at(12, 0));
        assert_eq!(neighbors.next, Some(event("Asr", 15, 30)));
        assert_eq!(neighbors.previous, Some(event("Dhuhr", 12, 0)));
    }

    #[test]
    fn test_empty_schedule_yields_nothing() {
        let neighbors = select_neighbors(&[], at(13, 0));
        assert_eq!(neighbors, Neighbors::default());
    }

    #[test]
    fn test_progress_halfway_between_events() {
        // 1:45 elapsed out of a 3:30 span
        let fraction = progress_fraction(at(12, 0), at(15, 30), at(13, 45));
        assert!((fraction - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_progress_clamps_outside_span() {
        assert_eq!(progress_fraction(at(12, 0), at(13, 0), at(11, 0)), 0.0);
        assert_eq!(progress_fraction(at(12, 0), at(13, 0), at(14, 0)), 1.0);
    }

    #[test]
    fn test_progress_zero_on_degenerate_span() {
        assert_eq!(progress_fraction(at(12, 0), at(12, 0), at(12, 0)), 0.0);
    }
}
