//! Runtime wiring: configuration, shared state, the command surface a
//! presentation layer drives, and the background polling loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use log::info;

use crate::core::alerts::sink::{AlertSink, DesktopSink};
use crate::core::alerts::tracker::{AlertTracker, AlertWindow};
use crate::core::config::{ConfigManager, Settings};
use crate::core::coordinator::{Coordinator, CycleOutcome};
use crate::core::source::{HtmlScheduleSource, ScheduleSource};
use crate::core::state::{AssetError, SharedState, TrackingSnapshot};

/// How long the loop dozes between pause-flag checks.
const PAUSE_POLL: Duration = Duration::from_secs(1);

/// Command surface for a presentation layer: everything a UI may do to the
/// tracker besides reading snapshots.
pub struct Controller {
    shared: SharedState,
    sink: Arc<dyn AlertSink>,
}

impl Controller {
    pub fn new(shared: SharedState, sink: Arc<dyn AlertSink>) -> Self {
        Self { shared, sink }
    }

    pub fn snapshot(&self) -> TrackingSnapshot {
        self.shared.snapshot()
    }

    pub fn set_running(&self, running: bool) {
        self.shared.set_running(running);
    }

    pub fn set_volume(&self, volume: f32) {
        self.shared.set_volume(volume);
    }

    pub fn set_alert_asset(&self, path: PathBuf) -> Result<(), AssetError> {
        self.shared.set_alert_asset(path)
    }

    /// Manual notification plus playback with the current asset.
    pub fn test_alert(&self) {
        let (asset, volume) = self.shared.alert_output();
        self.sink.notify("Adhan test", "Playing the alert sound now");
        self.sink.play_alert(&asset, volume);
    }
}

/// Periodic schedule re-evaluation. Runs until the process exits; the
/// running flag only pauses it.
pub async fn run_tracker_loop<S: ScheduleSource>(
    source: S,
    shared: SharedState,
    sink: Arc<dyn AlertSink>,
    settings: Settings,
) {
    let window = AlertWindow::new(
        i64::from(settings.pre_alarm_minutes),
        settings.grace_secs as i64,
    );
    let mut coordinator = Coordinator::new(AlertTracker::new(window));
    let poll = Duration::from_secs(settings.poll_interval_secs);
    let backoff = Duration::from_secs(settings.backoff_secs);

    info!("tracker loop started, polling every {poll:?}");
    loop {
        if !shared.is_running() {
            tokio::time::sleep(PAUSE_POLL).await;
            continue;
        }

        let today = Local::now().date_naive();
        let fetched = source.fetch(today).await;
        let outcome = coordinator.tick(
            fetched,
            Local::now().naive_local(),
            &shared,
            sink.as_ref(),
        );

        let wait = match outcome {
            CycleOutcome::NoSchedule => backoff,
            CycleOutcome::Updated | CycleOutcome::Alerted => poll,
        };
        tokio::time::sleep(wait).await;
    }
}

fn default_config_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config").join("adhan-watcher")
}

/// Builds the daemon from persisted settings and runs until interrupted.
pub async fn run() {
    let config_manager = ConfigManager::new(default_config_dir());
    let settings = config_manager.load();

    let shared = SharedState::new(&settings);
    let sink: Arc<dyn AlertSink> = Arc::new(DesktopSink);
    let controller = Controller::new(shared.clone(), sink.clone());
    let source = HtmlScheduleSource::new(settings.schedule_url.clone());

    // Headless: tracking starts immediately instead of waiting for a start
    // button.
    controller.set_running(true);
    info!("watching {}", settings.schedule_url);

    tokio::select! {
        () = run_tracker_loop(source, shared, sink, settings) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, exiting");
        }
    }
}
