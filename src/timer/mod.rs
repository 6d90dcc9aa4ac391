//! Countdown timer module
//!
//! The controller that runs countdowns and the helpers that display them.

pub mod controller;
pub mod display;

// Re-export main types
pub use controller::{TimerController, TICK_PERIOD};
pub use display::{format_time, remaining_line, render_countdown};
