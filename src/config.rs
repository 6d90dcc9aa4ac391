//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::{Parser, Subcommand};

use crate::{audio::DEFAULT_VOLUME, state::TimerInput};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "countdown-bell")]
#[command(about = "A countdown timer that rings an alarm clip when time runs out")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Sound file to ring instead of the bundled alarm
    #[arg(short, long)]
    pub sound: Option<PathBuf>,

    /// Alarm volume between 0.0 and 1.0
    #[arg(long, default_value_t = DEFAULT_VOLUME)]
    pub volume: f32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What to run; the HTTP server when omitted
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Count down in the terminal, ring the alarm and exit
    Run {
        /// Hours (empty or invalid counts as 0)
        #[arg(default_value = "0")]
        hours: String,
        /// Minutes (empty or invalid counts as 0)
        #[arg(default_value = "0")]
        minutes: String,
        /// Seconds (empty or invalid counts as 0)
        #[arg(default_value = "0")]
        seconds: String,
    },
}

impl Command {
    /// Normalized input for the `run` subcommand
    pub fn input(&self) -> TimerInput {
        match self {
            Command::Run { hours, minutes, seconds } => TimerInput::from_fields(hours, minutes, seconds),
        }
    }
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Volume clamped to the playable range
    pub fn volume(&self) -> f32 {
        self.volume.clamp(0.0, 1.0)
    }
}
