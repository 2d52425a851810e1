use pitchex_core::{StimulusCategory, TrialState, Triplet};

/// Trial generated by the session but not yet scored
#[derive(Debug, Clone)]
pub struct PendingTrial {
    pub index: usize,
    pub category: StimulusCategory,
    pub step: u32,
    pub triplet: Triplet,
    pub state: TrialState,
}

impl PendingTrial {
    pub fn is_presented(&self) -> bool {
        self.state == TrialState::AwaitingResponse
    }
}
