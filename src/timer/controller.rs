//! Countdown controller
//!
//! Owns the countdown state, the one-second tick task and the sound player
//! that rings when a run reaches zero.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::{
    sync::{oneshot, watch},
    time::{interval_at, Instant},
};
use tracing::{debug, info};

use crate::{
    audio::{AudioBackend, AudioReference, PlayerState, SoundPlayer},
    error::{PlaybackError, PlaybackResult},
    state::CountdownState,
};

/// Interval between decrements
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Runs one countdown at a time and triggers the alarm on expiry
///
/// Clones share the same countdown.
#[derive(Clone)]
pub struct TimerController {
    shared: Arc<Shared>,
}

struct Shared {
    backend: Arc<dyn AudioBackend>,
    inner: Mutex<ControllerInner>,
    state_tx: watch::Sender<CountdownState>,
}

struct ControllerInner {
    /// Id of the latest run; ticks from any other run are stale
    run: u64,
    /// Whether the latest run still accepts ticks
    ticking: bool,
    cancel: Option<oneshot::Sender<()>>,
    player: SoundPlayer,
}

#[derive(Debug, PartialEq, Eq)]
enum TickOutcome {
    Continue,
    Expired,
    Stale,
}

impl TimerController {
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        let (state_tx, _) = watch::channel(CountdownState::new());

        Self {
            shared: Arc::new(Shared {
                backend,
                inner: Mutex::new(ControllerInner {
                    run: 0,
                    ticking: false,
                    cancel: None,
                    player: SoundPlayer::unbound(),
                }),
                state_tx,
            }),
        }
    }

    /// Start a new countdown of `duration_seconds` that rings `audio` on expiry
    ///
    /// Any previous run is cancelled and its player silenced first. If `audio`
    /// cannot be resolved the error is returned and the current run is left alone.
    /// Must be called from within a tokio runtime.
    pub fn start(&self, duration_seconds: u64, audio: &AudioReference) -> PlaybackResult<()> {
        let player = SoundPlayer::new(self.shared.backend.as_ref(), audio)?;

        let mut inner = self.shared.lock();
        cancel_tick(&mut inner);
        inner.player.stop_playback();
        inner.player = player;
        inner.run += 1;
        let run = inner.run;

        info!(run, duration_seconds, audio = %audio, "Starting countdown");

        if duration_seconds == 0 {
            self.shared.publish(CountdownState::expired(run));
            info!(run, "Countdown expired immediately, ringing alarm");
            inner.player.start_playback();
            return Ok(());
        }

        inner.ticking = true;
        self.shared.publish(CountdownState::running(run, duration_seconds));

        let (cancel_tx, cancel_rx) = oneshot::channel();
        inner.cancel = Some(cancel_tx);
        drop(inner);

        tokio::spawn(countdown_task(Arc::clone(&self.shared), run, cancel_rx));
        Ok(())
    }

    /// Cancel the countdown, zero the remaining time and silence the alarm
    pub fn stop(&self) {
        let mut inner = self.shared.lock();
        cancel_tick(&mut inner);
        inner.player.stop_playback();
        self.shared.publish(CountdownState::idle(inner.run));
        info!(run = inner.run, "Timer stopped");
    }

    /// Tear down the controller when its owner goes away
    pub fn shutdown(&self) {
        self.stop();
        info!("Timer controller shut down");
    }

    /// Current countdown state
    pub fn snapshot(&self) -> CountdownState {
        self.shared.state_tx.borrow().clone()
    }

    /// Observe every countdown state change
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.shared.state_tx.subscribe()
    }

    pub fn player_state(&self) -> PlayerState {
        self.shared.lock().player.state()
    }

    /// Clip the current run will ring, once a run has been started
    pub fn player_audio(&self) -> Option<AudioReference> {
        self.shared.lock().player.audio()
    }

    /// Why the alarm of the current run could not be played, if it failed
    pub fn player_error(&self) -> Option<PlaybackError> {
        self.shared.lock().player.last_error()
    }

    /// Resolve `audio` without touching the running countdown
    pub fn check_audio(&self, audio: &AudioReference) -> PlaybackResult<()> {
        self.shared.backend.open(audio).map(drop)
    }
}

impl std::fmt::Debug for TimerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerController")
            .field("state", &self.snapshot())
            .finish()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ControllerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: CountdownState) {
        self.state_tx.send_replace(state);
    }

    /// Apply one decrement for `run`, ringing the alarm when it reaches zero
    fn tick(&self, run: u64) -> TickOutcome {
        let mut inner = self.lock();
        if inner.run != run || !inner.ticking {
            return TickOutcome::Stale;
        }

        let remaining = self.state_tx.borrow().remaining_seconds.saturating_sub(1);
        if remaining > 0 {
            debug!(run, remaining, "Tick");
            self.publish(CountdownState::running(run, remaining));
            return TickOutcome::Continue;
        }

        inner.ticking = false;
        inner.cancel = None;
        self.publish(CountdownState::expired(run));
        info!(run, "Countdown expired, ringing alarm");
        inner.player.start_playback();
        TickOutcome::Expired
    }
}

fn cancel_tick(inner: &mut ControllerInner) {
    inner.ticking = false;
    if let Some(cancel) = inner.cancel.take() {
        debug!(run = inner.run, "Cancelling in-flight countdown");
        let _ = cancel.send(());
    }
}

async fn countdown_task(shared: Arc<Shared>, run: u64, mut cancel_rx: oneshot::Receiver<()>) {
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if shared.tick(run) != TickOutcome::Continue {
                    break;
                }
            }
            _ = &mut cancel_rx => {
                debug!(run, "Countdown task cancelled");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio::testing::RecordingBackend, state::TimerPhase};

    fn controller() -> (TimerController, RecordingBackend) {
        let backend = RecordingBackend::new();
        (TimerController::new(Arc::new(backend.clone())), backend)
    }

    #[test]
    fn test_new_controller_is_idle() {
        let (timer, backend) = controller();
        assert_eq!(timer.snapshot(), CountdownState::new());
        assert_eq!(timer.player_state(), PlayerState::Unbound);
        assert_eq!(timer.player_audio(), None);
        assert_eq!(timer.player_error(), None);
        assert_eq!(backend.plays(), 0);
    }

    #[test]
    fn test_stop_without_start_is_harmless() {
        let (timer, _) = controller();
        timer.stop();
        timer.stop();
        assert_eq!(timer.snapshot().remaining_seconds, 0);
        assert_eq!(timer.snapshot().phase, TimerPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_from_stale_run_is_ignored() {
        let (timer, backend) = controller();
        timer.start(5, &AudioReference::Bundled).unwrap();
        timer.start(5, &AudioReference::Bundled).unwrap();

        assert_eq!(timer.shared.tick(1), TickOutcome::Stale);
        assert_eq!(timer.snapshot(), CountdownState::running(2, 5));

        timer.stop();
        assert_eq!(timer.shared.tick(2), TickOutcome::Stale);
        assert_eq!(timer.snapshot(), CountdownState::idle(2));
        assert_eq!(backend.plays(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_ticks_reach_expiry() {
        let (timer, backend) = controller();
        timer.start(2, &AudioReference::Bundled).unwrap();

        assert_eq!(timer.shared.tick(1), TickOutcome::Continue);
        assert_eq!(timer.snapshot().remaining_seconds, 1);
        assert_eq!(timer.shared.tick(1), TickOutcome::Expired);
        assert_eq!(timer.snapshot(), CountdownState::expired(1));
        assert_eq!(backend.plays(), 1);

        // The run is finished, the task's next tick must not ring again
        assert_eq!(timer.shared.tick(1), TickOutcome::Stale);
        assert_eq!(backend.plays(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_alarm_is_exposed() {
        let (timer, backend) = controller();
        backend.fail_playback(PlaybackError::Sink("device busy".to_string()));

        timer.start(0, &AudioReference::Bundled).unwrap();
        assert_eq!(timer.player_audio(), Some(AudioReference::Bundled));
        assert_eq!(timer.player_state(), PlayerState::Failed);
        assert_eq!(
            timer.player_error(),
            Some(PlaybackError::Sink("device busy".to_string()))
        );
        assert_eq!(timer.snapshot().phase, TimerPhase::Expired);
    }

    #[test]
    fn test_check_audio_reports_resolution_errors() {
        let (timer, backend) = controller();
        let missing = AudioReference::File("/gone.ogg".into());
        backend.reject(missing.clone());

        assert!(timer.check_audio(&AudioReference::Bundled).is_ok());
        assert!(timer.check_audio(&missing).is_err());
    }
}
