//! Timer input fields and their normalization

use serde::{Deserialize, Serialize};

/// Hours, minutes and seconds entered by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerInput {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimerInput {
    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self { hours, minutes, seconds }
    }

    /// Build from signed values, coercing negatives to zero
    pub fn from_signed(hours: i64, minutes: i64, seconds: i64) -> Self {
        Self::new(clamp_signed(hours), clamp_signed(minutes), clamp_signed(seconds))
    }

    /// Build from raw text fields; see [`parse_field`]
    pub fn from_fields(hours: &str, minutes: &str, seconds: &str) -> Self {
        Self::new(parse_field(hours), parse_field(minutes), parse_field(seconds))
    }

    /// Total countdown length in whole seconds
    ///
    /// No upper bound: minutes and seconds above 59 simply add up.
    pub fn total_seconds(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }
}

fn clamp_signed(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Parse one text field; empty, negative or non-numeric input counts as 0
pub fn parse_field(text: &str) -> u64 {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }
    text.parse::<i64>().map(clamp_signed).unwrap_or(0)
}
