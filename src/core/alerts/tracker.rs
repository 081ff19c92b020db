// Alert tracker - decides trigger eligibility and guarantees at-most-once
// firing per (event, day) occurrence.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::core::model::{PrayerEvent, TriggerKey};

/// Eligibility window around an event time.
///
/// An event may fire from `pre_alarm` before its time until `grace` after it.
/// The grace span absorbs a poll cycle landing just past the event boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlertWindow {
    pub pre_alarm: Duration,
    pub grace: Duration,
}

impl Default for AlertWindow {
    fn default() -> Self {
        Self {
            pre_alarm: Duration::minutes(5),
            grace: Duration::seconds(60),
        }
    }
}

impl AlertWindow {
    pub fn new(pre_alarm_minutes: i64, grace_secs: i64) -> Self {
        Self {
            pre_alarm: Duration::minutes(pre_alarm_minutes),
            grace: Duration::seconds(grace_secs),
        }
    }

    pub fn contains(&self, event_time: NaiveDateTime, now: NaiveDateTime) -> bool {
        now >= event_time - self.pre_alarm && now <= event_time + self.grace
    }
}

/// Per-occurrence trigger state.
///
/// Each key moves PENDING -> TRIGGERED exactly once; TRIGGERED is terminal
/// for the process lifetime. The set is never persisted, so a restart inside
/// an event's window can re-fire that occurrence.
pub struct AlertTracker {
    window: AlertWindow,
    triggered: HashSet<TriggerKey>,
}

impl AlertTracker {
    pub fn new(window: AlertWindow) -> Self {
        Self {
            window,
            triggered: HashSet::new(),
        }
    }

    /// True iff `now` falls inside the event's window and its occurrence has
    /// not fired yet this process run.
    pub fn should_trigger(&self, event: &PrayerEvent, now: NaiveDateTime) -> bool {
        self.window.contains(event.time, now) && !self.triggered.contains(&TriggerKey::of(event))
    }

    pub fn mark_triggered(&mut self, event: &PrayerEvent) {
        self.triggered.insert(TriggerKey::of(event));
    }

    /// Drops keys from days before `day`. Stale keys are harmless dead
    /// weight; this just bounds growth across long runs.
    pub fn prune_before(&mut self, day: NaiveDate) {
        self.triggered.retain(|key| key.day >= day);
    }

    #[allow(dead_code)]
    pub fn triggered_len(&self) -> usize {
        self.triggered.len()
    }
}
