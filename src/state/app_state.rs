//! Main application state management

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::{
    audio::{AudioBackend, AudioReference, PlayerState},
    error::{AppError, AppResult},
    timer::TimerController,
};
use super::{CountdownState, TimerInput};

/// Everything the timer screen holds: input fields, chosen sound and the controller
#[derive(Debug)]
pub struct AppState {
    /// Countdown and alarm playback
    pub controller: TimerController,
    /// Hours/minutes/seconds as last entered
    pub input: Arc<Mutex<TimerInput>>,
    /// Sound selected for this session
    pub audio: Arc<Mutex<AudioReference>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create the state with an idle timer and the bundled alarm selected
    pub fn new(port: u16, host: String, backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            controller: TimerController::new(backend),
            input: Arc::new(Mutex::new(TimerInput::default())),
            audio: Arc::new(Mutex::new(AudioReference::Bundled)),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Replace the entered hours/minutes/seconds
    pub fn set_input(&self, input: TimerInput) -> AppResult<TimerInput> {
        let mut current = self.input.lock().map_err(|_| AppError::Lock("input"))?;
        *current = input;
        drop(current);

        info!(
            "Timer input set to {}h {}m {}s",
            input.hours, input.minutes, input.seconds
        );
        self.record_action("input");
        Ok(input)
    }

    pub fn get_input(&self) -> AppResult<TimerInput> {
        self.input
            .lock()
            .map(|input| *input)
            .map_err(|_| AppError::Lock("input"))
    }

    /// Select the sound to ring; `None` picks the bundled alarm
    ///
    /// The selection is resolved first, a failing one keeps the previous choice.
    pub fn select_audio(&self, selection: Option<PathBuf>) -> AppResult<AudioReference> {
        let audio = AudioReference::from_selection(selection);
        if let Err(e) = self.controller.check_audio(&audio) {
            warn!("Rejected sound selection {}: {}", audio, e);
            return Err(e.into());
        }

        let mut current = self.audio.lock().map_err(|_| AppError::Lock("audio"))?;
        *current = audio.clone();
        drop(current);

        info!("Sound selected: {}", audio);
        self.record_action("sound");
        Ok(audio)
    }

    pub fn get_audio(&self) -> AppResult<AudioReference> {
        self.audio
            .lock()
            .map(|audio| audio.clone())
            .map_err(|_| AppError::Lock("audio"))
    }

    /// Start a countdown from the stored input with the selected sound
    pub fn start_timer(&self) -> AppResult<CountdownState> {
        let input = self.get_input()?;
        let audio = self.get_audio()?;

        self.controller.start(input.total_seconds(), &audio)?;
        self.record_action("start");
        Ok(self.controller.snapshot())
    }

    /// Stop the countdown and silence any alarm
    pub fn stop_timer(&self) -> CountdownState {
        self.controller.stop();
        self.record_action("stop");
        self.controller.snapshot()
    }

    pub fn get_timer_state(&self) -> CountdownState {
        self.controller.snapshot()
    }

    pub fn get_player_state(&self) -> PlayerState {
        self.controller.player_state()
    }

    pub fn get_player_audio(&self) -> Option<AudioReference> {
        self.controller.player_audio()
    }

    pub fn get_player_error(&self) -> Option<String> {
        self.controller.player_error().map(|e| e.to_string())
    }

    /// Tear down the screen, cancelling any in-flight countdown
    pub fn shutdown(&self) {
        self.controller.shutdown();
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio::testing::RecordingBackend, state::TimerPhase};

    fn app() -> (AppState, RecordingBackend) {
        let backend = RecordingBackend::new();
        let state = AppState::new(20554, "127.0.0.1".to_string(), Arc::new(backend.clone()));
        (state, backend)
    }

    #[test]
    fn test_defaults() {
        let (state, _) = app();
        assert_eq!(state.get_input().unwrap(), TimerInput::default());
        assert_eq!(state.get_audio().unwrap(), AudioReference::Bundled);
        assert_eq!(state.get_last_action(), (None, None));
        assert_eq!(state.get_uptime(), "0s");
    }

    #[test]
    fn test_rejected_selection_keeps_previous() {
        let (state, backend) = app();
        let good = PathBuf::from("/sounds/bell.ogg");
        let bad = PathBuf::from("/sounds/broken.ogg");
        backend.reject(AudioReference::File(bad.clone()));

        state.select_audio(Some(good.clone())).unwrap();
        assert!(matches!(
            state.select_audio(Some(bad)),
            Err(AppError::Playback(_))
        ));
        assert_eq!(state.get_audio().unwrap(), AudioReference::File(good));

        state.select_audio(None).unwrap();
        assert_eq!(state.get_audio().unwrap(), AudioReference::Bundled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_uses_stored_input_and_sound() {
        let (state, backend) = app();
        state.set_input(TimerInput::new(0, 1, 30)).unwrap();
        let bell = PathBuf::from("/sounds/bell.ogg");
        state.select_audio(Some(bell.clone())).unwrap();

        let snapshot = state.start_timer().unwrap();
        assert_eq!(snapshot.phase, TimerPhase::Running);
        assert_eq!(snapshot.remaining_seconds, 90);
        assert_eq!(backend.opened().last(), Some(&AudioReference::File(bell)));
        assert_eq!(state.get_last_action().0.as_deref(), Some("start"));

        let stopped = state.stop_timer();
        assert_eq!(stopped.phase, TimerPhase::Idle);
        assert_eq!(stopped.remaining_seconds, 0);
    }
}
