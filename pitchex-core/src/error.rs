//! Failure types reported by the session collaborators

use crate::StimulusCategory;
use thiserror::Error;

/// Presenting a triplet failed; the trial stays unscored and may be retried.
#[derive(Error, Debug)]
pub enum PresentationError {
    #[error("no recorded tone for {category} at {value}")]
    MissingTone {
        category: StimulusCategory,
        value: u32,
    },

    #[error("playback failed: {0}")]
    Playback(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A result sink could not store the session result.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("remote store error: {0}")]
    Remote(String),

    #[error("sink not configured: {0}")]
    Unconfigured(String),
}
