//! Stub implementation when the audio feature is disabled

use tracing::{debug, info};

use crate::error::{PlaybackError, PlaybackResult};
use super::{load_file, AudioBackend, AudioReference, CompletionHook, PlaybackHandle};

/// Backend that resolves clips like the real one but produces no sound
#[derive(Debug, Default)]
pub struct SilentBackend {
    volume: f32,
}

impl SilentBackend {
    pub fn new(volume: f32) -> Self {
        debug!("Audio feature not enabled, using silent backend");
        Self {
            volume: volume.clamp(0.0, 1.0),
        }
    }
}

impl AudioBackend for SilentBackend {
    fn open(&self, audio: &AudioReference) -> PlaybackResult<Box<dyn PlaybackHandle>> {
        if let AudioReference::File(path) = audio {
            load_file(path)?;
        }

        Ok(Box::new(SilentHandle {
            audio: audio.clone(),
            volume: self.volume,
        }))
    }
}

struct SilentHandle {
    audio: AudioReference,
    volume: f32,
}

impl PlaybackHandle for SilentHandle {
    fn play(&mut self, on_finished: CompletionHook) -> Result<(), PlaybackError> {
        info!(audio = %self.audio, volume = self.volume, "Alarm (silent build)");
        std::thread::spawn(on_finished);
        Ok(())
    }

    fn stop(&mut self) {}
}
