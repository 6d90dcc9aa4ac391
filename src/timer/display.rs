//! Remaining-time rendering

use tokio::sync::watch;

use crate::state::CountdownState;

/// Render whole seconds as `HH:MM:SS`; hours grow past two digits unclamped
pub fn format_time(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

pub fn remaining_line(state: &CountdownState) -> String {
    format!("Remaining Time: {}", state.formatted())
}

/// Print the remaining time on every change until the run stops running
///
/// Returns the last observed state.
pub async fn render_countdown(mut rx: watch::Receiver<CountdownState>) -> CountdownState {
    let mut state = rx.borrow_and_update().clone();
    println!("{}", remaining_line(&state));

    while state.is_running() {
        if rx.changed().await.is_err() {
            break;
        }
        state = rx.borrow_and_update().clone();
        println!("{}", remaining_line(&state));
    }

    state
}
