//! State management module
//! 
//! This module contains the countdown snapshot, the user's input fields and
//! the application state that ties them to the timer controller.

pub mod app_state;
pub mod countdown_state;
pub mod timer_input;

// Re-export main types
pub use app_state::AppState;
pub use countdown_state::{CountdownState, TimerPhase};
pub use timer_input::{parse_field, TimerInput};
