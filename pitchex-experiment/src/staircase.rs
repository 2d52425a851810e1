use crate::config::{StaircaseConfig, WrongAnswerPolicy};
use pitchex_core::StimulusCategory;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Same-direction answers needed before the step moves
pub const RUN_LENGTH: u32 = 2;

/// Per-category staircase position
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifficultyState {
    pub current_step: u32,
    pub consecutive_correct: u32,
    pub consecutive_wrong: u32,
}

impl DifficultyState {
    fn new(initial_step: u32) -> Self {
        Self {
            current_step: initial_step,
            consecutive_correct: 0,
            consecutive_wrong: 0,
        }
    }
}

/// Run-based adaptive staircase, one independent state per category.
///
/// Two correct answers in a row shrink the step by one (harder). What a wrong
/// answer does depends on [`WrongAnswerPolicy`]. The step always stays within
/// `[min_step, max_step]`.
#[derive(Debug, Clone)]
pub struct Staircase {
    min_step: u32,
    max_step: u32,
    policy: WrongAnswerPolicy,
    states: BTreeMap<StimulusCategory, DifficultyState>,
}

impl Staircase {
    pub fn new(config: &StaircaseConfig) -> Self {
        let states = StimulusCategory::ALL
            .iter()
            .map(|&c| {
                let initial = config
                    .initial_step
                    .get(c)
                    .clamp(config.min_step, config.max_step.max(config.min_step));
                (c, DifficultyState::new(initial))
            })
            .collect();
        Self {
            min_step: config.min_step,
            max_step: config.max_step,
            policy: config.wrong_answer_policy,
            states,
        }
    }

    pub fn current_step(&self, category: StimulusCategory) -> u32 {
        self.state(category).current_step
    }

    pub fn state(&self, category: StimulusCategory) -> DifficultyState {
        self.states
            .get(&category)
            .copied()
            .unwrap_or_else(|| DifficultyState::new(self.min_step))
    }

    pub fn policy(&self) -> WrongAnswerPolicy {
        self.policy
    }

    /// Feeds one scored answer back into `category`'s state.
    pub fn record_outcome(&mut self, category: StimulusCategory, is_correct: bool) {
        let (min_step, max_step, policy) = (self.min_step, self.max_step, self.policy);
        let state = self
            .states
            .entry(category)
            .or_insert_with(|| DifficultyState::new(min_step));
        let before = state.current_step;

        if is_correct {
            state.consecutive_correct += 1;
            state.consecutive_wrong = 0;
            if state.consecutive_correct >= RUN_LENGTH {
                state.current_step = state.current_step.saturating_sub(1).max(min_step);
                state.consecutive_correct = 0;
            }
        } else {
            state.consecutive_correct = 0;
            if policy == WrongAnswerPolicy::Symmetric {
                state.consecutive_wrong += 1;
                if state.consecutive_wrong >= RUN_LENGTH {
                    state.current_step = (state.current_step + 1).min(max_step);
                    state.consecutive_wrong = 0;
                }
            }
        }

        if state.current_step != before {
            debug!(
                category = %category,
                from = before,
                to = state.current_step,
                "staircase step changed"
            );
        }
    }

    /// Snapshot of every category's current step
    pub fn final_steps(&self) -> BTreeMap<StimulusCategory, u32> {
        self.states
            .iter()
            .map(|(c, s)| (*c, s.current_step))
            .collect()
    }
}
