use pitchex_core::StimulusCategory;
use rand::Rng;
use rand::seq::SliceRandom;

/// Balanced, shuffled category order for a whole session.
///
/// Each category gets `total_trials / n` trials; the remainder goes to the
/// earliest categories in [`StimulusCategory::ALL`], so with two categories
/// `Voice` gets `ceil(n/2)` and `Piano` gets `floor(n/2)`. The order is a
/// uniform permutation of that multiset.
pub fn generate_sequence<R: Rng + ?Sized>(total_trials: usize, rng: &mut R) -> Vec<StimulusCategory> {
    let categories = StimulusCategory::ALL;
    let per_category = total_trials / categories.len();
    let remainder = total_trials % categories.len();

    let mut sequence = Vec::with_capacity(total_trials);
    for (i, category) in categories.iter().enumerate() {
        let count = per_category + usize::from(i < remainder);
        sequence.extend(std::iter::repeat_n(*category, count));
    }
    sequence.shuffle(rng);
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn count(seq: &[StimulusCategory], category: StimulusCategory) -> usize {
        seq.iter().filter(|c| **c == category).count()
    }

    #[test]
    fn single_trial_is_voice() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(generate_sequence(1, &mut rng), vec![StimulusCategory::Voice]);
    }

    #[test]
    fn zero_trials_is_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(generate_sequence(0, &mut rng).is_empty());
    }

    #[test]
    fn same_seed_same_order() {
        let a = generate_sequence(30, &mut StdRng::seed_from_u64(42));
        let b = generate_sequence(30, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn shuffling_actually_mixes() {
        // 30 trials staying in the unshuffled order is a 1 in C(30,15) event
        let seq = generate_sequence(30, &mut StdRng::seed_from_u64(3));
        let sorted: Vec<_> = {
            let mut s = seq.clone();
            s.sort();
            s
        };
        assert_ne!(seq, sorted);
    }

    #[test]
    fn first_position_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(11);
        let runs = 4000;
        let voice_first = (0..runs)
            .filter(|_| generate_sequence(4, &mut rng)[0] == StimulusCategory::Voice)
            .count();
        let share = voice_first as f64 / runs as f64;
        assert!((0.45..0.55).contains(&share), "share was {share}");
    }

    proptest! {
        #[test]
        fn split_is_ceil_floor_for_every_seed(total in 1usize..200, seed in any::<u64>()) {
            let seq = generate_sequence(total, &mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(seq.len(), total);
            prop_assert_eq!(count(&seq, StimulusCategory::Voice), total.div_ceil(2));
            prop_assert_eq!(count(&seq, StimulusCategory::Piano), total / 2);
        }
    }
}
