//! Single-clip sound player

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{PlaybackError, PlaybackResult};
use super::AudioReference;

/// Callback fired once when a clip reaches its natural end
pub type CompletionHook = Box<dyn FnOnce() + Send + 'static>;

/// One resolved, ready-to-play clip
///
/// Implementations must not invoke `on_finished` from inside `play` itself;
/// completion is always reported from another thread or task. When `play`
/// returns an error the hook is dropped without being called.
pub trait PlaybackHandle: Send {
    /// Start output from the beginning of the clip, replacing any output in progress
    fn play(&mut self, on_finished: CompletionHook) -> Result<(), PlaybackError>;

    /// Halt output immediately. Safe when nothing is playing.
    fn stop(&mut self);
}

/// Resolves audio references into playable handles
pub trait AudioBackend: Send + Sync {
    fn open(&self, audio: &AudioReference) -> PlaybackResult<Box<dyn PlaybackHandle>>;
}

/// Lifecycle of a [`SoundPlayer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Unbound,
    Ready,
    Playing,
    Stopped,
    /// The last start could not produce output
    Failed,
}

struct PlayerInner {
    handle: Option<Box<dyn PlaybackHandle>>,
    audio: Option<AudioReference>,
    state: PlayerState,
    last_error: Option<PlaybackError>,
    /// Bumped on every start/stop so late completions from older plays are ignored
    generation: u64,
}

impl PlayerInner {
    fn halt(&mut self) {
        self.generation += 1;

        if let Some(handle) = self.handle.as_mut() {
            handle.stop();
        }
        if self.state == PlayerState::Playing {
            self.state = PlayerState::Stopped;
        }
    }
}

/// Plays exactly one clip to completion or until stopped
///
/// Clones share the same underlying handle.
#[derive(Clone)]
pub struct SoundPlayer {
    inner: Arc<Mutex<PlayerInner>>,
}

fn lock(inner: &Mutex<PlayerInner>) -> MutexGuard<'_, PlayerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SoundPlayer {
    fn with_handle(handle: Option<Box<dyn PlaybackHandle>>, audio: Option<AudioReference>) -> Self {
        let state = if handle.is_some() {
            PlayerState::Ready
        } else {
            PlayerState::Unbound
        };

        Self {
            inner: Arc::new(Mutex::new(PlayerInner {
                handle,
                audio,
                state,
                last_error: None,
                generation: 0,
            })),
        }
    }

    /// A player with no clip bound; starting it does nothing
    pub fn unbound() -> Self {
        Self::with_handle(None, None)
    }

    /// Resolve `audio` through `backend` and bind the resulting handle
    pub fn new(backend: &dyn AudioBackend, audio: &AudioReference) -> PlaybackResult<Self> {
        let handle = backend.open(audio)?;
        debug!(audio = %audio, "Sound player ready");
        Ok(Self::with_handle(Some(handle), Some(audio.clone())))
    }

    /// Begin playback from the start of the clip
    ///
    /// A failure to produce output leaves the player `Failed` with the error
    /// available from [`SoundPlayer::last_error`].
    pub fn start_playback(&self) {
        let mut inner = lock(&self.inner);
        if inner.handle.is_none() {
            warn!("Playback requested on an unbound sound player, ignoring");
            return;
        }

        inner.generation += 1;
        inner.state = PlayerState::Playing;
        inner.last_error = None;
        let hook = completion_hook(Arc::downgrade(&self.inner), inner.generation);

        if let Some(audio) = &inner.audio {
            info!(audio = %audio, "Starting playback");
        }
        let result = match inner.handle.as_mut() {
            Some(handle) => handle.play(hook),
            None => Ok(()),
        };

        if let Err(e) = result {
            error!("Playback failed: {}", e);
            inner.generation += 1;
            inner.state = PlayerState::Failed;
            inner.last_error = Some(e);
        }
    }

    /// Halt playback; safe in every state
    pub fn stop_playback(&self) {
        let mut inner = lock(&self.inner);
        if inner.state == PlayerState::Playing {
            debug!("Playback stopped");
        }
        inner.halt();
    }

    pub fn state(&self) -> PlayerState {
        lock(&self.inner).state
    }

    /// Clip this player is bound to, if any
    pub fn audio(&self) -> Option<AudioReference> {
        lock(&self.inner).audio.clone()
    }

    /// Why the most recent start produced no output
    pub fn last_error(&self) -> Option<PlaybackError> {
        lock(&self.inner).last_error.clone()
    }
}

/// Natural completion takes the same stop path as `stop_playback`
fn completion_hook(inner: Weak<Mutex<PlayerInner>>, generation: u64) -> CompletionHook {
    Box::new(move || {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let mut inner = lock(&inner);
        if inner.generation == generation && inner.state == PlayerState::Playing {
            debug!("Clip finished, player stopped");
            inner.halt();
        }
    })
}

impl std::fmt::Debug for SoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("SoundPlayer")
            .field("audio", &inner.audio)
            .field("state", &inner.state)
            .field("last_error", &inner.last_error)
            .finish()
    }
}

impl Default for SoundPlayer {
    fn default() -> Self {
        Self::unbound()
    }
}
