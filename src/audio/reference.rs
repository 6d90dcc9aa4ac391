//! Audio reference selection

use std::{fmt, path::PathBuf};
use serde::{Deserialize, Serialize};

/// Which clip rings when a countdown expires
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum AudioReference {
    /// The alarm shipped with the application
    #[default]
    Bundled,
    /// A sound file picked by the user
    File(PathBuf),
}

impl AudioReference {
    /// Map a user selection to a reference, falling back to the bundled clip
    pub fn from_selection(selection: Option<PathBuf>) -> Self {
        match selection {
            Some(path) => AudioReference::File(path),
            None => AudioReference::Bundled,
        }
    }

    /// Human readable name used in logs and status output
    pub fn label(&self) -> String {
        match self {
            AudioReference::Bundled => "bundled".to_string(),
            AudioReference::File(path) => path.display().to_string(),
        }
    }
}

impl fmt::Display for AudioReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
