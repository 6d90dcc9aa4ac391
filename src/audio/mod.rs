//! Alarm audio
//!
//! Resolves the bundled clip or a user-selected sound file into a playable
//! handle and wraps it in a [`SoundPlayer`]. Real output goes through rodio
//! when the `audio` feature is enabled; otherwise a silent backend stands in.

mod player;
mod reference;

#[cfg(feature = "audio")]
mod rodio_backend;

#[cfg(not(feature = "audio"))]
mod stub;

#[cfg(test)]
pub(crate) mod testing;

pub use player::{AudioBackend, CompletionHook, PlaybackHandle, PlayerState, SoundPlayer};
pub use reference::AudioReference;

#[cfg(feature = "audio")]
pub use rodio_backend::RodioBackend;

#[cfg(not(feature = "audio"))]
pub use stub::SilentBackend;

use std::{path::Path, sync::Arc};

use crate::error::{PlaybackInitError, PlaybackResult};

/// Default alarm volume (0.0 to 1.0)
pub const DEFAULT_VOLUME: f32 = 0.8;

/// Build the backend for this build's audio support
#[cfg(feature = "audio")]
pub fn output_backend(volume: f32) -> PlaybackResult<Arc<dyn AudioBackend>> {
    Ok(Arc::new(RodioBackend::new(volume)?))
}

/// Build the backend for this build's audio support
#[cfg(not(feature = "audio"))]
pub fn output_backend(volume: f32) -> PlaybackResult<Arc<dyn AudioBackend>> {
    Ok(Arc::new(SilentBackend::new(volume)))
}

/// Read a user-selected sound file fully into memory
pub(crate) fn load_file(path: &Path) -> PlaybackResult<Arc<[u8]>> {
    if !path.exists() {
        return Err(PlaybackInitError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| PlaybackInitError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(bytes.into())
}
