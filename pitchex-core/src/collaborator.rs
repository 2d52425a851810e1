use crate::{PresentationError, SessionResult, SinkError, StimulusCategory, TRIPLET_LEN};

/// Plays a triplet: exactly three items, in order, with a gap between them.
///
/// Returns once playback has finished. Errors must be reported, never
/// swallowed, so the session can void the trial.
pub trait Presenter {
    fn present(
        &mut self,
        category: StimulusCategory,
        values: [u32; TRIPLET_LEN],
    ) -> Result<(), PresentationError>;
}

/// Participant's answer for one trial
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub position: usize,
    pub elapsed_ms: u64,
}

/// Collects the participant's choice after presentation.
pub trait Responder {
    /// Blocks until a choice is made. `None` means the participant quit.
    fn await_choice(&mut self) -> Option<Response>;
}

/// Durable destination for a finished session
pub trait ResultSink {
    fn name(&self) -> &str;
    fn deliver(&self, result: &SessionResult) -> Result<(), SinkError>;
}
