use crate::{StimulusCategory, TrialRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything a finished session hands to the result sinks.
///
/// `participant` is opaque here: whatever the form collected, already turned
/// into JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub participant: serde_json::Value,
    pub trials: Vec<TrialRecord>,
    pub final_difficulty: BTreeMap<StimulusCategory, u32>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl SessionResult {
    pub fn trials_for(&self, category: StimulusCategory) -> impl Iterator<Item = &TrialRecord> {
        self.trials.iter().filter(move |t| t.category == category)
    }

    /// Percentage of correct trials for `category`, 0 when it had none
    pub fn accuracy(&self, category: StimulusCategory) -> f64 {
        let (total, correct) = self
            .trials_for(category)
            .fold((0usize, 0usize), |(n, c), t| (n + 1, c + t.is_correct as usize));
        if total == 0 {
            return 0.0;
        }
        correct as f64 / total as f64 * 100.0
    }

    pub fn mean_latency_ms(&self) -> f64 {
        if self.trials.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.trials.iter().map(|t| t.response_latency_ms).sum();
        sum as f64 / self.trials.len() as f64
    }

    pub fn final_step(&self, category: StimulusCategory) -> Option<u32> {
        self.final_difficulty.get(&category).copied()
    }

    pub fn duration_secs(&self) -> i64 {
        (self.ended_at - self.started_at).num_seconds()
    }

    /// Reads a top-level string or number field of the participant record.
    pub fn participant_field(&self, key: &str) -> Option<String> {
        match self.participant.get(key)? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn record(index: usize, category: StimulusCategory, is_correct: bool, ms: u64) -> TrialRecord {
        TrialRecord {
            index,
            category,
            base_value: 132,
            odd_value: 136,
            magnitude_of_difference: 4,
            difficulty_step: 4,
            odd_position: 1,
            user_position: if is_correct { 1 } else { 0 },
            is_correct,
            response_latency_ms: ms,
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    fn sample() -> SessionResult {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        SessionResult {
            participant: json!({ "name": "Ada", "age": 31, "instrument": "" }),
            trials: vec![
                record(0, StimulusCategory::Voice, true, 1000),
                record(1, StimulusCategory::Piano, false, 3000),
                record(2, StimulusCategory::Voice, false, 2000),
            ],
            final_difficulty: BTreeMap::from([
                (StimulusCategory::Voice, 4),
                (StimulusCategory::Piano, 5),
            ]),
            started_at: start,
            ended_at: start + Duration::seconds(95),
        }
    }

    #[test]
    fn accuracy_is_per_category() {
        let r = sample();
        assert_eq!(r.accuracy(StimulusCategory::Voice), 50.0);
        assert_eq!(r.accuracy(StimulusCategory::Piano), 0.0);
    }

    #[test]
    fn accuracy_of_category_without_trials_is_zero() {
        let mut r = sample();
        r.trials.retain(|t| t.category == StimulusCategory::Voice);
        assert_eq!(r.accuracy(StimulusCategory::Piano), 0.0);
    }

    #[test]
    fn averages_and_duration() {
        let r = sample();
        assert_eq!(r.mean_latency_ms(), 2000.0);
        assert_eq!(r.duration_secs(), 95);
        assert_eq!(r.final_step(StimulusCategory::Piano), Some(5));
    }

    #[test]
    fn participant_fields_skip_blank_values() {
        let r = sample();
        assert_eq!(r.participant_field("name").as_deref(), Some("Ada"));
        assert_eq!(r.participant_field("age").as_deref(), Some("31"));
        assert_eq!(r.participant_field("instrument"), None);
        assert_eq!(r.participant_field("missing"), None);
    }

    #[test]
    fn serializes_final_difficulty_with_category_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["final_difficulty"]["voice"], 4);
        assert_eq!(value["final_difficulty"]["piano"], 5);
        assert_eq!(value["trials"][1]["category"], "piano");
    }
}
