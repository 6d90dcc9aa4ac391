//! Audio output using rodio

use rodio::{source::SineWave, source::Zero, Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::{
    io::Cursor,
    path::{Path, PathBuf},
    sync::{mpsc, Arc},
    time::Duration,
};
use tracing::{debug, info};

use crate::error::{PlaybackError, PlaybackInitError, PlaybackResult};
use super::{load_file, AudioBackend, AudioReference, CompletionHook, PlaybackHandle};

/// Backend playing through the default output device
///
/// `OutputStream` is not `Send`, so it lives on its own thread for as long
/// as the backend exists; only the handle is shared.
pub struct RodioBackend {
    output: OutputStreamHandle,
    volume: f32,
    _keepalive: mpsc::Sender<()>,
}

impl RodioBackend {
    pub fn new(volume: f32) -> PlaybackResult<Self> {
        let (ready_tx, ready_rx) = mpsc::channel();
        let (keepalive_tx, keepalive_rx) = mpsc::channel::<()>();

        std::thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    let _ = ready_tx.send(Ok(handle));
                    // Returns once the backend drops its sender
                    let _ = keepalive_rx.recv();
                    drop(stream);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                }
            })
            .map_err(|e| PlaybackInitError::OutputUnavailable(e.to_string()))?;

        let output = ready_rx
            .recv()
            .map_err(|e| PlaybackInitError::OutputUnavailable(e.to_string()))?
            .map_err(PlaybackInitError::OutputUnavailable)?;

        info!("Audio output initialized");

        Ok(Self {
            output,
            volume: volume.clamp(0.0, 1.0),
            _keepalive: keepalive_tx,
        })
    }
}

impl AudioBackend for RodioBackend {
    fn open(&self, audio: &AudioReference) -> PlaybackResult<Box<dyn PlaybackHandle>> {
        let clip = match audio {
            AudioReference::Bundled => Clip::Alarm,
            AudioReference::File(path) => {
                let bytes = load_file(path)?;
                check_decodes(path, &bytes)?;
                Clip::Encoded { path: path.clone(), bytes }
            }
        };

        debug!(audio = %audio, "Resolved audio clip");

        Ok(Box::new(RodioHandle {
            output: self.output.clone(),
            clip,
            volume: self.volume,
            sink: None,
        }))
    }
}

/// Decode once up front so a bad file fails when selected, not at expiry
fn check_decodes(path: &Path, bytes: &Arc<[u8]>) -> PlaybackResult<()> {
    Decoder::new(Cursor::new(Arc::clone(bytes)))
        .map(drop)
        .map_err(|e| PlaybackInitError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

enum Clip {
    /// Synthesized bundled alarm
    Alarm,
    Encoded { path: PathBuf, bytes: Arc<[u8]> },
}

struct RodioHandle {
    output: OutputStreamHandle,
    clip: Clip,
    volume: f32,
    sink: Option<Arc<Sink>>,
}

impl RodioHandle {
    fn load_into(&self, sink: &Sink) -> Result<(), PlaybackError> {
        match &self.clip {
            Clip::Alarm => {
                for _ in 0..3 {
                    sink.append(
                        SineWave::new(880.0)
                            .take_duration(Duration::from_millis(250))
                            .amplify(0.3),
                    );
                    sink.append(Zero::<f32>::new(1, 44100).take_duration(Duration::from_millis(120)));
                    sink.append(
                        SineWave::new(1046.5)
                            .take_duration(Duration::from_millis(350))
                            .amplify(0.3),
                    );
                    sink.append(Zero::<f32>::new(1, 44100).take_duration(Duration::from_millis(400)));
                }
                Ok(())
            }
            Clip::Encoded { path, bytes } => {
                let source = Decoder::new(Cursor::new(Arc::clone(bytes)))
                    .map_err(|e| PlaybackError::Decode(format!("{}: {}", path.display(), e)))?;
                sink.append(source);
                Ok(())
            }
        }
    }
}

impl PlaybackHandle for RodioHandle {
    fn play(&mut self, on_finished: CompletionHook) -> Result<(), PlaybackError> {
        self.stop();

        let sink = Sink::try_new(&self.output).map_err(|e| PlaybackError::Sink(e.to_string()))?;
        sink.set_volume(self.volume);
        self.load_into(&sink)?;

        let sink = Arc::new(sink);
        let waiter = Arc::clone(&sink);
        self.sink = Some(sink);

        std::thread::spawn(move || {
            waiter.sleep_until_end();
            on_finished();
        });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
