use chrono::NaiveDateTime;
use log::{info, warn};

use super::alerts::sink::AlertSink;
use super::alerts::tracker::AlertTracker;
use super::model::Schedule;
use super::selector;
use super::source::SourceError;
use super::state::SharedState;

/// What a polling cycle did; the loop maps this to its next sleep interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Schedule unavailable; shared state cleared, caller should back off.
    NoSchedule,
    /// Shared state refreshed without firing an alert.
    Updated,
    /// Shared state refreshed and an alert was dispatched.
    Alerted,
}

/// Drives one polling cycle: publish selector results, then evaluate the
/// alert window for the upcoming event.
///
/// The fetch result and reference time arrive as inputs so tests can run
/// cycles against a virtual clock without sleeping.
pub struct Coordinator {
    tracker: AlertTracker,
}

impl Coordinator {
    pub fn new(tracker: AlertTracker) -> Self {
        Self { tracker }
    }

    pub fn tick(
        &mut self,
        fetched: Result<Schedule, SourceError>,
        now: NaiveDateTime,
        shared: &SharedState,
        sink: &dyn AlertSink,
    ) -> CycleOutcome {
        let schedule = match fetched {
            Ok(schedule) if !schedule.is_empty() => schedule,
            Ok(_) => {
                warn!("schedule source returned no rows");
                shared.clear_position();
                return CycleOutcome::NoSchedule;
            }
            Err(e) => {
                warn!("schedule fetch failed: {e}");
                shared.clear_position();
                return CycleOutcome::NoSchedule;
            }
        };

        // 1. Publish the bracketing pair before any alert evaluation.
        let neighbors = selector::select_neighbors(&schedule, now);
        let next = neighbors.next.clone();
        shared.publish_position(neighbors.next, neighbors.previous.map(|event| event.time));

        // 2. Keys from earlier days are dead weight once the day rolls over.
        self.tracker.prune_before(now.date());

        // 3. Evaluate the window for the upcoming event.
        if let Some(event) = next {
            if self.tracker.should_trigger(&event, now) {
                // Marked before dispatch: each occurrence is attempted at
                // most once, even if delivery then fails.
                self.tracker.mark_triggered(&event);
                info!("alert window reached for {} at {}", event.name, event.time);

                let (asset, volume) = shared.alert_output();
                sink.notify(
                    "Prayer reminder",
                    &format!("{} at {}", event.name, event.time.format("%I:%M %p")),
                );
                sink.play_alert(&asset, volume);
                return CycleOutcome::Alerted;
            }
        }

        CycleOutcome::Updated
    }
}
