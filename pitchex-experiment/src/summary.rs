use pitchex_core::{SessionResult, StimulusCategory};
use serde::Serialize;

/// Coarse reading of the final thresholds, lower steps being finer hearing.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ThresholdBand {
    Excellent,
    Good,
    Developing,
}

impl ThresholdBand {
    /// `Excellent` when every step is at most 2, `Developing` when every step
    /// is above 4, `Good` otherwise.
    pub fn classify(steps: impl IntoIterator<Item = u32>) -> Self {
        let steps: Vec<u32> = steps.into_iter().collect();
        if !steps.is_empty() && steps.iter().all(|&s| s <= 2) {
            Self::Excellent
        } else if !steps.is_empty() && steps.iter().all(|&s| s > 4) {
            Self::Developing
        } else {
            Self::Good
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Excellent => {
                "Excellent pitch discrimination! You can detect very small pitch differences."
            }
            Self::Good => {
                "Good pitch discrimination ability. You can detect moderate pitch differences reliably."
            }
            Self::Developing => {
                "Your pitch discrimination is developing. With practice, you may improve your ability to detect smaller differences."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: StimulusCategory,
    pub trials: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub final_step: Option<u32>,
}

/// Basic accuracy and timing figures shown at the end of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub categories: Vec<CategorySummary>,
    pub total_trials: usize,
    pub mean_latency_ms: f64,
    pub duration_secs: i64,
    pub band: ThresholdBand,
}

impl SessionSummary {
    pub fn from_result(result: &SessionResult) -> Self {
        let categories = StimulusCategory::ALL
            .iter()
            .map(|&category| {
                let trials = result.trials_for(category).count();
                let correct = result.trials_for(category).filter(|t| t.is_correct).count();
                CategorySummary {
                    category,
                    trials,
                    correct,
                    accuracy: result.accuracy(category),
                    final_step: result.final_step(category),
                }
            })
            .collect();

        Self {
            categories,
            total_trials: result.trials.len(),
            mean_latency_ms: result.mean_latency_ms(),
            duration_secs: result.duration_secs(),
            band: ThresholdBand::classify(result.final_difficulty.values().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_final_steps() {
        assert_eq!(ThresholdBand::classify([1, 2]), ThresholdBand::Excellent);
        assert_eq!(ThresholdBand::classify([3, 4]), ThresholdBand::Good);
        assert_eq!(ThresholdBand::classify([2, 5]), ThresholdBand::Good);
        assert_eq!(ThresholdBand::classify([5, 9]), ThresholdBand::Developing);
        assert_eq!(ThresholdBand::classify(Vec::new()), ThresholdBand::Good);
    }
}
