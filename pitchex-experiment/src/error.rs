use pitchex_core::{PresentationError, SinkError, StimulusCategory};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExperimentError>;

/// Settings a session refuses to start with
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("total_trials must be positive")]
    NoTrials,

    #[error("min_step must be at least 1")]
    ZeroMinStep,

    #[error("min_step {min_step} exceeds max_step {max_step}")]
    StepBounds { min_step: u32, max_step: u32 },

    #[error("initial step {step} for {category} is outside [{min_step}, {max_step}]")]
    InitialStep {
        category: StimulusCategory,
        step: u32,
        min_step: u32,
        max_step: u32,
    },

    #[error("stimulus candidate set is empty")]
    NoCandidates,

    #[error("stimulus candidate set needs at least 2 levels, got {levels}")]
    TooFewCandidates { levels: u32 },

    #[error("stimulus candidates {lowest} + {levels} levels exceed the value range")]
    CandidateOverflow { lowest: u32, levels: u32 },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One sink that failed to store the result
#[derive(Debug)]
pub struct SinkFailure {
    pub sink: String,
    pub error: SinkError,
}

impl fmt::Display for SinkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.sink, self.error)
    }
}

/// Everything a caller of the session can get back
#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("presentation failed: {0}")]
    Presentation(#[from] PresentationError),

    #[error("{} of {attempted} result sinks failed", .failures.len())]
    Sink {
        attempted: usize,
        failures: Vec<SinkFailure>,
    },

    #[error("response position {position} is not one of 0, 1, 2")]
    InvalidResponse { position: usize },

    #[error("trial {index} has not been presented yet")]
    NotPresented { index: usize },

    #[error("all {total} trials are already recorded")]
    SessionFinished { total: usize },

    #[error("session incomplete: {completed} of {total} trials recorded")]
    Incomplete { completed: usize, total: usize },

    #[error("participant left the session")]
    Abandoned,
}
