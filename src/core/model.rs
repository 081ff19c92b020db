use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub type PrayerName = String;

/// A named prayer occurrence on a specific calendar day.
///
/// Times are naive local wall-clock values: the source combines the parsed
/// clock time with the requested day, and everything downstream compares
/// against the local clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrayerEvent {
    pub name: PrayerName,
    pub time: NaiveDateTime,
}

impl PrayerEvent {
    pub fn day(&self) -> NaiveDate {
        self.time.date()
    }
}

/// Identity of one event occurrence, used for at-most-once alerting.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TriggerKey {
    pub name: PrayerName,
    pub day: NaiveDate,
}

impl TriggerKey {
    pub fn of(event: &PrayerEvent) -> Self {
        Self {
            name: event.name.clone(),
            day: event.time.date(),
        }
    }
}

/// One day's events, sorted ascending by time. Produced fresh on every poll.
pub type Schedule = Vec<PrayerEvent>;
