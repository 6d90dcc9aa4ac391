//! Countdown Bell - a countdown timer that rings an alarm clip
//! 
//! This library provides the countdown controller, the single-clip sound
//! player it triggers on expiry, and an HTTP surface for driving both.

pub mod api;
pub mod audio;
pub mod config;
pub mod error;
pub mod state;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use audio::{AudioBackend, AudioReference, PlayerState, SoundPlayer};
pub use config::Config;
pub use error::{AppError, PlaybackInitError};
pub use state::{AppState, CountdownState, TimerInput, TimerPhase};
pub use timer::{format_time, TimerController};
pub use utils::signals::shutdown_signal;
