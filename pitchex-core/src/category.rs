use serde::{Deserialize, Serialize};
use std::fmt;

/// Stimulus source discriminated within a session
#[derive(Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StimulusCategory {
    Voice,
    Piano,
}

impl StimulusCategory {
    /// Every category, in sequence-balancing order. The first entry receives
    /// the extra trial when the total does not divide evenly.
    pub const ALL: [StimulusCategory; 2] = [StimulusCategory::Voice, StimulusCategory::Piano];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Voice => "Voice",
            Self::Piano => "Piano",
        }
    }

    /// Directory name holding this category's recorded tones
    pub fn media_dir(&self) -> &'static str {
        match self {
            Self::Voice => "voice",
            Self::Piano => "piano",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Voice => "Human Voice",
            Self::Piano => "Piano",
        }
    }
}

impl fmt::Display for StimulusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.media_dir())
    }
}
