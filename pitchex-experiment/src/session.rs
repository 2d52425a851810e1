use super::config::{BasePolicy, ExperimentConfig};
use super::error::{ExperimentError, Result};
use super::sequence::generate_sequence;
use super::staircase::Staircase;
use super::trial::PendingTrial;
use super::triplet::TripletGenerator;
use chrono::{DateTime, Utc};
use pitchex_core::{
    Presenter, Responder, Response, SessionResult, StimulusCategory, TRIPLET_LEN, TrialRecord,
    TrialState,
};
use rand::Rng;
use tracing::{debug, info, warn};

/// Drives one participant through the whole trial sequence.
///
/// Owns its staircase, generator, RNG and trial log; nothing is shared with
/// other sessions. Dropping a session before [`Session::finish`] abandons it.
pub struct Session<R: Rng> {
    config: ExperimentConfig,
    participant: serde_json::Value,
    sequence: Vec<StimulusCategory>,
    staircase: Staircase,
    generator: TripletGenerator,
    rng: R,
    current: Option<PendingTrial>,
    records: Vec<TrialRecord>,
    started_at: DateTime<Utc>,
}

impl<R: Rng> Session<R> {
    pub fn new(config: ExperimentConfig, participant: serde_json::Value, mut rng: R) -> Result<Self> {
        config.validate()?;
        let sequence = generate_sequence(config.total_trials, &mut rng);
        Self::with_sequence(config, participant, sequence, rng)
    }

    /// Starts a session over a category order chosen by the caller, e.g. to
    /// replay a previous session. `config.total_trials` is set to its length.
    pub fn with_sequence(
        mut config: ExperimentConfig,
        participant: serde_json::Value,
        sequence: Vec<StimulusCategory>,
        rng: R,
    ) -> Result<Self> {
        config.total_trials = sequence.len();
        config.validate()?;

        let staircase = Staircase::new(&config.staircase);
        let generator = TripletGenerator::new(&config.stimuli);
        let reach = config.stimuli.symmetric_reach();
        if config.stimuli.base_policy == BasePolicy::SymmetricRandom
            && config.staircase.max_step > reach
        {
            warn!(
                max_step = config.staircase.max_step,
                reach,
                "steps above reach fall back to the midpoint base and may ask for tones outside the candidate set"
            );
        }
        let started_at = Utc::now();
        info!(
            trials = sequence.len(),
            policy = ?config.staircase.wrong_answer_policy,
            base_policy = ?config.stimuli.base_policy,
            "session started"
        );

        Ok(Self {
            config,
            participant,
            sequence,
            staircase,
            generator,
            rng,
            current: None,
            records: Vec::new(),
            started_at,
        })
    }

    /// Returns the pending trial, generating it on first call.
    pub fn prepare_trial(&mut self) -> Result<&PendingTrial> {
        let pending = match self.current.take() {
            Some(pending) => pending,
            None => self.generate_trial()?,
        };
        Ok(self.current.insert(pending))
    }

    /// Replaces the pending triplet with a fresh one at the same step.
    pub fn regenerate_trial(&mut self) -> Result<&PendingTrial> {
        self.current = None;
        self.prepare_trial()
    }

    fn generate_trial(&mut self) -> Result<PendingTrial> {
        let index = self.records.len();
        let Some(&category) = self.sequence.get(index) else {
            return Err(ExperimentError::SessionFinished {
                total: self.sequence.len(),
            });
        };
        let step = self.staircase.current_step(category);
        let triplet = self.generator.generate(category, step, &mut self.rng);
        debug!(
            index,
            category = %category,
            step,
            values = ?triplet.values(),
            odd_position = triplet.odd_position,
            "trial generated"
        );
        Ok(PendingTrial {
            index,
            category,
            step,
            triplet,
            state: TrialState::Ready,
        })
    }

    /// Hands the pending triplet to the presenter.
    ///
    /// On failure nothing is scored or recorded and the same triplet stays
    /// pending, so calling `present` again retries it.
    pub fn present<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Result<()> {
        let (category, values, index) = {
            let pending = self.prepare_trial()?;
            (pending.category, pending.triplet.values(), pending.index)
        };

        if let Err(e) = presenter.present(category, values) {
            warn!(index, category = %category, error = %e, "presentation failed, trial voided");
            if let Some(pending) = self.current.as_mut() {
                pending.state = TrialState::Ready;
            }
            return Err(e.into());
        }

        if let Some(pending) = self.current.as_mut() {
            pending.state = TrialState::AwaitingResponse;
        }
        Ok(())
    }

    /// Scores a response against the presented trial and records it.
    pub fn score(&mut self, response: Response) -> Result<&TrialRecord> {
        let index = self.records.len();
        match &self.current {
            Some(pending) if pending.is_presented() => {}
            _ => return Err(ExperimentError::NotPresented { index }),
        }
        if response.position >= TRIPLET_LEN {
            return Err(ExperimentError::InvalidResponse {
                position: response.position,
            });
        }
        let Some(pending) = self.current.take() else {
            return Err(ExperimentError::NotPresented { index });
        };

        let triplet = &pending.triplet;
        let is_correct = response.position == triplet.odd_position;
        self.staircase.record_outcome(pending.category, is_correct);

        let record = TrialRecord {
            index: pending.index,
            category: pending.category,
            base_value: triplet.base_value(),
            odd_value: triplet.odd_value(),
            magnitude_of_difference: triplet.difference(),
            difficulty_step: pending.step,
            odd_position: triplet.odd_position,
            user_position: response.position,
            is_correct,
            response_latency_ms: response.elapsed_ms,
            timestamp: Utc::now(),
        };
        info!(
            index = record.index,
            category = %record.category,
            step = record.difficulty_step,
            correct = is_correct,
            latency_ms = record.response_latency_ms,
            "trial recorded"
        );
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Presents the next trial, waits for the participant and scores the answer.
    pub fn run_trial<P, S>(&mut self, presenter: &mut P, responder: &mut S) -> Result<&TrialRecord>
    where
        P: Presenter + ?Sized,
        S: Responder + ?Sized,
    {
        self.present(presenter)?;
        let response = responder.await_choice().ok_or(ExperimentError::Abandoned)?;
        self.score(response)
    }

    /// Assembles the result once every trial is recorded.
    pub fn finish(self) -> Result<SessionResult> {
        if !self.is_complete() {
            return Err(ExperimentError::Incomplete {
                completed: self.records.len(),
                total: self.sequence.len(),
            });
        }
        let ended_at = Utc::now();
        let final_difficulty = self.staircase.final_steps();
        info!(?final_difficulty, "session finished");
        Ok(SessionResult {
            participant: self.participant,
            trials: self.records,
            final_difficulty,
            started_at: self.started_at,
            ended_at,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.records.len() >= self.sequence.len()
    }

    /// `(completed, total)` trial counts
    pub fn progress(&self) -> (usize, usize) {
        (self.records.len(), self.sequence.len())
    }

    /// Completed trials of `category` and how many the sequence holds
    pub fn category_progress(&self, category: StimulusCategory) -> (usize, usize) {
        let done = self.records.iter().filter(|r| r.category == category).count();
        let total = self.sequence.iter().filter(|c| **c == category).count();
        (done, total)
    }

    pub fn current_step(&self, category: StimulusCategory) -> u32 {
        self.staircase.current_step(category)
    }

    pub fn pending(&self) -> Option<&PendingTrial> {
        self.current.as_ref()
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn sequence(&self) -> &[StimulusCategory] {
        &self.sequence
    }

    pub fn staircase(&self) -> &Staircase {
        &self.staircase
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }
}
