//! Audio playback for alert sounds.
//!
//! Playback runs on a detached thread and never reports errors to the
//! caller; a failed alert sound must not disturb the polling loop.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::warn;
use rodio::{Decoder, OutputStreamBuilder, Sink};

/// File extensions accepted as alert assets.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac"];

pub fn is_supported_asset(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("asset not readable: {0}")]
    Io(#[from] std::io::Error),
    #[error("audio device unavailable: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("asset not decodable: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Fire-and-forget playback. Failures are logged at warn level and dropped.
pub fn play_detached(path: &Path, volume: f32) {
    let path = path.to_path_buf();
    std::thread::spawn(move || {
        if let Err(e) = play_blocking(&path, volume) {
            warn!("alert playback failed for {:?}: {e}", path);
        }
    });
}

/// Decodes and plays the asset to completion on the default output device.
fn play_blocking(path: &Path, volume: f32) -> Result<(), PlaybackError> {
    let file = File::open(path)?;
    // The stream must outlive playback, so it stays on this thread's stack.
    let stream = OutputStreamBuilder::open_default_stream()?;
    let sink = Sink::connect_new(stream.mixer());
    let source = Decoder::new(BufReader::new(file))?;
    sink.set_volume(volume.clamp(0.0, 1.0));
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_asset(&PathBuf::from("sound/prayer_notifier.mp3")));
        assert!(is_supported_asset(&PathBuf::from("ALERT.WAV")));
        assert!(is_supported_asset(&PathBuf::from("chime.ogg")));
    }

    #[test]
    fn test_unsupported_paths() {
        assert!(!is_supported_asset(&PathBuf::from("notes.txt")));
        assert!(!is_supported_asset(&PathBuf::from("no_extension")));
        assert!(!is_supported_asset(&PathBuf::from("archive.mp3.zip")));
    }
}
