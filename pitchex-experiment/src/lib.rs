pub mod config;
pub mod delivery;
pub mod error;
pub mod sequence;
pub mod session;
pub mod staircase;
pub mod summary;
pub mod trial;
pub mod triplet;

pub use config::{
    BasePolicy, ExperimentConfig, InitialSteps, StaircaseConfig, StimulusConfig,
    WrongAnswerPolicy,
};
pub use delivery::{DeliveryReport, deliver_all, retry_failed};
pub use error::{ConfigError, ExperimentError, SinkFailure};
pub use sequence::generate_sequence;
pub use session::Session;
pub use staircase::{DifficultyState, Staircase};
pub use summary::{CategorySummary, SessionSummary, ThresholdBand};
pub use trial::PendingTrial;
pub use triplet::TripletGenerator;
