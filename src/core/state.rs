use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use serde::Serialize;

use super::audio;
use super::config::Settings;
use super::model::PrayerEvent;
use super::selector;

/// Point-in-time copy of the tracking state shared between the polling loop
/// and a presentation layer.
#[derive(Clone, Debug, Serialize)]
pub struct TrackingSnapshot {
    pub running: bool,
    pub next_event: Option<PrayerEvent>,
    pub previous_event_time: Option<NaiveDateTime>,
    pub alert_volume: f32,
    pub alert_asset_path: PathBuf,
}

impl TrackingSnapshot {
    /// Seconds until the next event, floored at zero. None when no event is
    /// published.
    pub fn countdown_secs(&self, now: NaiveDateTime) -> Option<i64> {
        self.next_event
            .as_ref()
            .map(|event| (event.time - now).num_seconds().max(0))
    }

    /// Elapsed fraction of the span from the previous event to the next.
    /// With no previous event the span starts at `now`, so the bar reads
    /// empty until the first event of the day has passed.
    pub fn progress(&self, now: NaiveDateTime) -> Option<f64> {
        let next = self.next_event.as_ref()?;
        let start = self.previous_event_time.unwrap_or(now);
        Some(selector::progress_fraction(start, next.time, now))
    }
}

/// Rejection reasons for a user-chosen alert asset.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("not an audio file: {0:?}")]
    Unsupported(PathBuf),
    #[error("file does not exist: {0:?}")]
    Missing(PathBuf),
}

/// Handle to the shared tracking state.
///
/// One lock guards every field so the (next, previous) pair written by the
/// polling loop is always read whole.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<Mutex<TrackingSnapshot>>,
}

impl SharedState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TrackingSnapshot {
                running: false,
                next_event: None,
                previous_event_time: None,
                alert_volume: settings.alert_volume.clamp(0.0, 1.0),
                alert_asset_path: settings.alert_asset_path.clone(),
            })),
        }
    }

    pub fn snapshot(&self) -> TrackingSnapshot {
        self.inner.lock().unwrap().clone()
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock().unwrap().running
    }

    /// Starting leaves the published pair for the next cycle to refresh;
    /// stopping clears it so readers show "no data" instead of stale times.
    pub fn set_running(&self, running: bool) {
        let mut state = self.inner.lock().unwrap();
        state.running = running;
        if !running {
            state.next_event = None;
            state.previous_event_time = None;
        }
    }

    pub fn publish_position(
        &self,
        next: Option<PrayerEvent>,
        previous: Option<NaiveDateTime>,
    ) {
        let mut state = self.inner.lock().unwrap();
        state.next_event = next;
        state.previous_event_time = previous;
    }

    pub fn clear_position(&self) {
        self.publish_position(None, None);
    }

    pub fn set_volume(&self, volume: f32) {
        self.inner.lock().unwrap().alert_volume = volume.clamp(0.0, 1.0);
    }

    /// Validated at the boundary: a rejected path leaves the prior asset
    /// unchanged.
    pub fn set_alert_asset(&self, path: PathBuf) -> Result<(), AssetError> {
        if !audio::is_supported_asset(&path) {
            return Err(AssetError::Unsupported(path));
        }
        if !path.exists() {
            return Err(AssetError::Missing(path));
        }
        self.inner.lock().unwrap().alert_asset_path = path;
        Ok(())
    }

    /// Current (asset, volume) pair for playback.
    pub fn alert_output(&self) -> (PathBuf, f32) {
        let state = self.inner.lock().unwrap();
        (state.alert_asset_path.clone(), state.alert_volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs::File;
    use tempfile::tempdir;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn shared() -> SharedState {
        SharedState::new(&Settings::default())
    }

    #[test]
    fn test_volume_is_clamped() {
        let state = shared();
        state.set_volume(2.5);
        assert_eq!(state.snapshot().alert_volume, 1.0);
        state.set_volume(-1.0);
        assert_eq!(state.snapshot().alert_volume, 0.0);
    }

    #[test]
    fn test_stopping_clears_published_pair() {
        let state = shared();
        state.set_running(true);
        state.publish_position(
            Some(PrayerEvent {
                name: "Asr".to_string(),
                time: at(15, 30),
            }),
            Some(at(12, 0)),
        );

        state.set_running(false);

        let snapshot = state.snapshot();
        assert!(!snapshot.running);
        assert!(snapshot.next_event.is_none());
        assert!(snapshot.previous_event_time.is_none());
    }

    #[test]
    fn test_asset_rejections_leave_state_unchanged() {
        let dir = tempdir().unwrap();
        let state = shared();
        let original = state.snapshot().alert_asset_path;

        let text_file = dir.path().join("notes.txt");
        File::create(&text_file).unwrap();
        assert!(matches!(
            state.set_alert_asset(text_file),
            Err(AssetError::Unsupported(_))
        ));

        assert!(matches!(
            state.set_alert_asset(dir.path().join("ghost.mp3")),
            Err(AssetError::Missing(_))
        ));

        assert_eq!(state.snapshot().alert_asset_path, original);
    }

    #[test]
    fn test_valid_asset_is_accepted() {
        let dir = tempdir().unwrap();
        let state = shared();

        let asset = dir.path().join("adhan.wav");
        File::create(&asset).unwrap();
        state.set_alert_asset(asset.clone()).unwrap();

        assert_eq!(state.snapshot().alert_asset_path, asset);
    }

    #[test]
    fn test_countdown_and_progress() {
        let state = shared();
        state.publish_position(
            Some(PrayerEvent {
                name: "Asr".to_string(),
                time: at(15, 30),
            }),
            Some(at(12, 0)),
        );

        let snapshot = state.snapshot();
        assert_eq!(snapshot.countdown_secs(at(15, 0)), Some(30 * 60));
        assert_eq!(snapshot.countdown_secs(at(16, 0)), Some(0));

        let fraction = snapshot.progress(at(13, 45)).unwrap();
        assert!((fraction - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_progress_without_published_pair() {
        let state = shared();
        let snapshot = state.snapshot();
        assert!(snapshot.progress(at(13, 0)).is_none());
        assert!(snapshot.countdown_secs(at(13, 0)).is_none());
    }
}
