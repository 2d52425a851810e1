use crate::error::ConfigError;
use pitchex_core::StimulusCategory;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a wrong answer does to the staircase.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrongAnswerPolicy {
    /// Two wrong answers in a row make the task one step easier.
    #[default]
    Symmetric,
    /// A wrong answer only breaks the correct-answer run; the step never rises.
    Asymmetric,
}

/// How the triplet generator picks its base value.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BasePolicy {
    /// Random base leaving room for `base ± step`, odd item above or below.
    #[default]
    SymmetricRandom,
    /// Base pinned to the lowest candidate, odd item always above (clamped).
    FixedAnchor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialSteps {
    pub voice: u32,
    pub piano: u32,
}

impl InitialSteps {
    pub fn get(&self, category: StimulusCategory) -> u32 {
        match category {
            StimulusCategory::Voice => self.voice,
            StimulusCategory::Piano => self.piano,
        }
    }
}

impl Default for InitialSteps {
    fn default() -> Self {
        Self { voice: 4, piano: 4 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaircaseConfig {
    pub min_step: u32,
    pub max_step: u32,
    pub initial_step: InitialSteps,
    pub wrong_answer_policy: WrongAnswerPolicy,
}

impl Default for StaircaseConfig {
    fn default() -> Self {
        Self {
            min_step: 1,
            max_step: 9,
            initial_step: InitialSteps::default(),
            wrong_answer_policy: WrongAnswerPolicy::Symmetric,
        }
    }
}

/// Candidate magnitudes: `levels` contiguous integers starting at `lowest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StimulusConfig {
    pub lowest: u32,
    pub levels: u32,
    pub base_policy: BasePolicy,
}

impl StimulusConfig {
    /// Empty when `lowest + levels` overflows; `validate` rejects that case.
    pub fn candidates(&self) -> Vec<u32> {
        match self.lowest.checked_add(self.levels) {
            Some(end) => (self.lowest..end).collect(),
            None => Vec::new(),
        }
    }

    /// Largest step for which a symmetric triplet stays inside the candidate set.
    pub fn symmetric_reach(&self) -> u32 {
        self.levels.saturating_sub(1) / 2
    }
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            lowest: 128,
            levels: 10,
            base_policy: BasePolicy::SymmetricRandom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub total_trials: usize,
    pub inter_tone_gap_ms: u64,
    pub feedback_duration_ms: u64,
    pub staircase: StaircaseConfig,
    pub stimuli: StimulusConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            total_trials: 10,
            inter_tone_gap_ms: 500,
            feedback_duration_ms: 2000,
            staircase: StaircaseConfig::default(),
            stimuli: StimulusConfig::default(),
        }
    }
}

impl ExperimentConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Rejects settings a session cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        let StaircaseConfig {
            min_step, max_step, ..
        } = self.staircase;
        if min_step == 0 {
            return Err(ConfigError::ZeroMinStep);
        }
        if min_step > max_step {
            return Err(ConfigError::StepBounds { min_step, max_step });
        }
        for category in StimulusCategory::ALL {
            let step = self.staircase.initial_step.get(category);
            if !(min_step..=max_step).contains(&step) {
                return Err(ConfigError::InitialStep {
                    category,
                    step,
                    min_step,
                    max_step,
                });
            }
        }
        let StimulusConfig { lowest, levels, .. } = self.stimuli;
        if levels == 0 {
            return Err(ConfigError::NoCandidates);
        }
        if levels < 2 {
            return Err(ConfigError::TooFewCandidates { levels });
        }
        if lowest.checked_add(levels).is_none() {
            return Err(ConfigError::CandidateOverflow { lowest, levels });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ExperimentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stimuli.candidates().first(), Some(&128));
        assert_eq!(config.stimuli.candidates().last(), Some(&137));
    }

    #[test]
    fn parses_partial_toml_over_defaults() {
        let config = ExperimentConfig::from_toml_str(
            r#"
            total_trials = 30

            [staircase]
            max_step = 6
            wrong_answer_policy = "asymmetric"

            [staircase.initial_step]
            piano = 5

            [stimuli]
            base_policy = "fixed-anchor"
            "#,
        )
        .unwrap();
        assert_eq!(config.total_trials, 30);
        assert_eq!(config.staircase.min_step, 1);
        assert_eq!(config.staircase.max_step, 6);
        assert_eq!(config.staircase.initial_step.voice, 4);
        assert_eq!(config.staircase.initial_step.piano, 5);
        assert_eq!(
            config.staircase.wrong_answer_policy,
            WrongAnswerPolicy::Asymmetric
        );
        assert_eq!(config.stimuli.base_policy, BasePolicy::FixedAnchor);
        assert_eq!(config.inter_tone_gap_ms, 500);
    }

    #[test]
    fn unknown_policy_name_is_a_parse_error() {
        let err = ExperimentConfig::from_toml_str("[staircase]\nwrong_answer_policy = \"sideways\"")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_zero_trials() {
        let config = ExperimentConfig {
            total_trials: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoTrials)));
    }

    #[test]
    fn rejects_inverted_step_bounds() {
        let mut config = ExperimentConfig::default();
        config.staircase.min_step = 7;
        config.staircase.max_step = 3;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StepBounds {
                min_step: 7,
                max_step: 3
            })
        ));
    }

    #[test]
    fn rejects_zero_min_step() {
        let mut config = ExperimentConfig::default();
        config.staircase.min_step = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroMinStep)));
    }

    #[test]
    fn rejects_initial_step_outside_bounds() {
        let mut config = ExperimentConfig::default();
        config.staircase.max_step = 6;
        config.staircase.initial_step.piano = 8;
        match config.validate() {
            Err(ConfigError::InitialStep { category, step, .. }) => {
                assert_eq!(category, StimulusCategory::Piano);
                assert_eq!(step, 8);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_candidate_set() {
        let mut config = ExperimentConfig::default();
        config.stimuli.levels = 0;
        assert!(matches!(config.validate(), Err(ConfigError::NoCandidates)));
    }

    #[test]
    fn rejects_single_level_candidate_set() {
        let mut config = ExperimentConfig::default();
        config.stimuli.levels = 1;
        config.stimuli.base_policy = BasePolicy::FixedAnchor;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooFewCandidates { levels: 1 })
        ));
    }

    #[test]
    fn rejects_candidate_range_past_u32_max() {
        let mut config = ExperimentConfig::default();
        config.stimuli.lowest = u32::MAX - 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CandidateOverflow { levels: 10, .. })
        ));
        assert!(config.stimuli.candidates().is_empty());
    }

    #[test]
    fn symmetric_reach_of_default_candidates() {
        let config = ExperimentConfig::default();
        assert_eq!(config.stimuli.symmetric_reach(), 4);
        assert!(config.staircase.max_step > config.stimuli.symmetric_reach());
    }
}
