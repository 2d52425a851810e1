use crate::StimulusCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of the pending trial held by a session
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum TrialState {
    /// Triplet generated, not yet (successfully) presented
    Ready,
    /// Presentation finished, waiting for the participant's choice
    AwaitingResponse,
}

/// Recorded result per trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub index: usize,
    pub category: StimulusCategory,
    pub base_value: u32,
    pub odd_value: u32,
    pub magnitude_of_difference: u32,
    pub difficulty_step: u32,
    pub odd_position: usize,
    pub user_position: usize,
    pub is_correct: bool,
    pub response_latency_ms: u64,
    pub timestamp: DateTime<Utc>,
}
