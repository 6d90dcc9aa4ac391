//! Shared helpers for integration tests

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use countdown_bell::{
    audio::{AudioBackend, AudioReference, CompletionHook, PlaybackHandle},
    error::{PlaybackError, PlaybackInitError, PlaybackResult},
};

#[derive(Default)]
struct Record {
    rejected: Vec<AudioReference>,
    plays: Vec<AudioReference>,
    stops: usize,
    play_failure: Option<PlaybackError>,
    hooks: VecDeque<CompletionHook>,
}

/// Backend that produces no sound and remembers what it was asked to do
#[derive(Clone, Default)]
pub struct FakeBackend {
    record: Arc<Mutex<Record>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(&self) -> Arc<dyn AudioBackend> {
        Arc::new(self.clone())
    }

    pub fn reject(&self, path: &str) {
        self.record
            .lock()
            .unwrap()
            .rejected
            .push(AudioReference::File(PathBuf::from(path)));
    }

    /// Make every following play fail with `error`
    pub fn fail_playback(&self, error: PlaybackError) {
        self.record.lock().unwrap().play_failure = Some(error);
    }

    pub fn played(&self) -> Vec<AudioReference> {
        self.record.lock().unwrap().plays.clone()
    }

    pub fn stops(&self) -> usize {
        self.record.lock().unwrap().stops
    }

    /// Let every clip currently playing run to its end
    pub fn finish_all(&self) {
        let hooks: Vec<_> = self.record.lock().unwrap().hooks.drain(..).collect();
        for hook in hooks {
            hook();
        }
    }
}

impl AudioBackend for FakeBackend {
    fn open(&self, audio: &AudioReference) -> PlaybackResult<Box<dyn PlaybackHandle>> {
        if self.record.lock().unwrap().rejected.contains(audio) {
            let path = match audio {
                AudioReference::File(path) => path.clone(),
                AudioReference::Bundled => PathBuf::from("bundled"),
            };
            return Err(PlaybackInitError::NotFound(path));
        }

        Ok(Box::new(FakeHandle {
            audio: audio.clone(),
            record: Arc::clone(&self.record),
        }))
    }
}

struct FakeHandle {
    audio: AudioReference,
    record: Arc<Mutex<Record>>,
}

impl PlaybackHandle for FakeHandle {
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
