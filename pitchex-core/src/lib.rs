pub mod category;
pub mod collaborator;
pub mod error;
pub mod result;
pub mod stimulus;
pub mod trial;

pub use category::StimulusCategory;
pub use collaborator::{Presenter, Responder, Response, ResultSink};
pub use error::{PresentationError, SinkError};
pub use result::SessionResult;
pub use stimulus::{StimulusItem, Triplet};
pub use trial::{TrialRecord, TrialState};

/// Number of items in every stimulus set.
pub const TRIPLET_LEN: usize = 3;
