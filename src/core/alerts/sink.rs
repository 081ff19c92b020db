// Outbound alert boundary: OS toast and audio dispatch.

use std::path::Path;

use log::warn;
use notify_rust::Notification;

use crate::core::audio;

/// Where fired alerts go. Implementations must return without blocking the
/// polling loop and must swallow their own delivery failures.
pub trait AlertSink: Send + Sync {
    fn notify(&self, title: &str, message: &str);
    fn play_alert(&self, path: &Path, volume: f32);
}

/// Production sink: desktop toast plus alert sound, each on a detached
/// thread. Delivery failures are logged and dropped.
pub struct DesktopSink;

impl AlertSink for DesktopSink {
    fn notify(&self, title: &str, message: &str) {
        let title = title.to_string();
        let message = message.to_string();
        std::thread::spawn(move || {
            let result = Notification::new()
                .summary(&title)
                .body(&message)
                .timeout(notify_rust::Timeout::Milliseconds(6_000))
                .show();
            if let Err(e) = result {
                warn!("desktop notification failed: {e}");
            }
        });
    }

    fn play_alert(&self, path: &Path, volume: f32) {
        audio::play_detached(path, volume);
    }
}
