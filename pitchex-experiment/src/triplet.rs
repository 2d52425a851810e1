use crate::config::{BasePolicy, StimulusConfig};
use pitchex_core::{StimulusCategory, TRIPLET_LEN, Triplet};
use rand::Rng;

/// Builds one odd-one-out stimulus set per trial.
#[derive(Debug, Clone)]
pub struct TripletGenerator {
    candidates: Vec<u32>,
    policy: BasePolicy,
}

impl TripletGenerator {
    /// `config` must carry a non-empty candidate set (checked by
    /// `ExperimentConfig::validate`).
    pub fn new(config: &StimulusConfig) -> Self {
        Self {
            candidates: config.candidates(),
            policy: config.base_policy,
        }
    }

    pub fn policy(&self) -> BasePolicy {
        self.policy
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        category: StimulusCategory,
        step: u32,
        rng: &mut R,
    ) -> Triplet {
        let (base, odd) = match self.policy {
            BasePolicy::SymmetricRandom => {
                let base = self.random_base(step, rng);
                let odd = if rng.random_bool(0.5) {
                    base + step
                } else {
                    base.saturating_sub(step)
                };
                (base, odd)
            }
            BasePolicy::FixedAnchor => {
                let base = self.lowest();
                (base, (base + step).min(self.highest()))
            }
        };
        let odd_position = rng.random_range(0..TRIPLET_LEN);
        Triplet::new(category, base, odd, odd_position)
    }

    /// Uniform pick among bases with room for `base ± step`; the midpoint
    /// candidate when the step is too wide for the range.
    fn random_base<R: Rng + ?Sized>(&self, step: u32, rng: &mut R) -> u32 {
        let (lowest, highest) = (self.lowest(), self.highest());
        let valid: Vec<u32> = self
            .candidates
            .iter()
            .copied()
            .filter(|&c| c >= lowest + step && c + step <= highest)
            .collect();
        if valid.is_empty() {
            return self.midpoint();
        }
        valid[rng.random_range(0..valid.len())]
    }

    fn lowest(&self) -> u32 {
        self.candidates.first().copied().unwrap_or_default()
    }

    fn highest(&self) -> u32 {
        self.candidates.last().copied().unwrap_or_default()
    }

    fn midpoint(&self) -> u32 {
        self.candidates
            .get(self.candidates.len() / 2)
            .copied()
            .unwrap_or_default()
    }
}
