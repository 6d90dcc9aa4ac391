//! In-memory backend used by unit tests

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use crate::error::{PlaybackError, PlaybackInitError, PlaybackResult};
use super::{AudioBackend, AudioReference, CompletionHook, PlaybackHandle};

#[derive(Default)]
struct Record {
    opened: Vec<AudioReference>,
    rejected: Vec<AudioReference>,
    plays: Vec<AudioReference>,
    stops: usize,
    play_failure: Option<PlaybackError>,
    hooks: VecDeque<CompletionHook>,
}

/// Records every open/play/stop and holds completion hooks until a test fires them
#[derive(Clone, Default)]
pub struct RecordingBackend {
    record: Arc<Mutex<Record>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&self, audio: AudioReference) {
        self.record.lock().unwrap().rejected.push(audio);
    }

    /// Make every following play fail with `error`
    pub fn fail_playback(&self, error: PlaybackError) {
        self.record.lock().unwrap().play_failure = Some(error);
    }

    pub fn clear_playback_failure(&self) {
        self.record.lock().unwrap().play_failure = None;
    }

    pub fn opened(&self) -> Vec<AudioReference> {
        self.record.lock().unwrap().opened.clone()
    }

    pub fn plays(&self) -> usize {
        self.record.lock().unwrap().plays.len()
    }

    pub fn stops(&self) -> usize {
        self.record.lock().unwrap().stops
    }

    pub fn finish_oldest(&self) {
        let hook = self.record.lock().unwrap().hooks.pop_front();
        if let Some(hook) = hook {
            hook();
        }
    }

    pub fn finish_all(&self) {
        let hooks: Vec<_> = self.record.lock().unwrap().hooks.drain(..).collect();
        for hook in hooks {
            hook();
        }
    }
}

impl AudioBackend for RecordingBackend {
    fn open(&self, audio: &AudioReference) -> PlaybackResult<Box<dyn PlaybackHandle>> {
        let mut record = self.record.lock().unwrap();
        if record.rejected.contains(audio) {
            let path = match audio {
                AudioReference::File(path) => path.clone(),
                AudioReference::Bundled => "bundled".into(),
            };
            return Err(PlaybackInitError::NotFound(path));
        }
        record.opened.push(audio.clone());

        Ok(Box::new(RecordingHandle {
            audio: audio.clone(),
            record: Arc::clone(&self.record),
        }))
    }
}

struct RecordingHandle {
    audio: AudioReference,
    record: Arc<Mutex<Record>>,
}

impl PlaybackHandle for RecordingHandle {
    fn play(&mut self, on_finished: CompletionHook) -> Result<(), PlaybackError> {
        let mut record = self.record.lock().unwrap();
        if let Some(error) = record.play_failure.clone() {
            return Err(error);
        }
        record.plays.push(self.audio.clone());
        record.hooks.push_back(on_finished);
        Ok(())
    }

    fn stop(&mut self) {
        self.record.lock().unwrap().stops += 1;
    }
}
