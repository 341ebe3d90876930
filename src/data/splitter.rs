// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Randomly shuffles samples and splits them into two sets:
//   - Training set:   used to update model weights
//   - Validation set: used to pick the checkpoint
//
// The split happens once per run. With a seed the partition is
// reproducible; without one it is drawn from OS entropy.
//
// train size = floor(n * train_fraction), the rest is validation.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Build the run's RNG from an optional seed.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    }
}

/// Shuffle `samples` and split into (train, validation).
///
/// # Example
/// ```ignore
/// let mut rng = seeded_rng(Some(42));
/// let (train, val) = split_train_val((0..10).collect(), 0.8, &mut rng);
/// assert_eq!((train.len(), val.len()), (8, 2));
/// ```
pub fn split_train_val<T>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    rng:            &mut StdRng,
) -> (Vec<T>, Vec<T>) {
    samples.shuffle(rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).floor() as usize;

    // Clamp to valid range to avoid panics on fractions above 1
    let split_at = split_at.min(total);

    // After this: samples = [0..split_at], val = [split_at..total]
    let val = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation ({}% / {}%)",
        samples.len(),
        val.len(),
        (samples.len() * 100) / total.max(1),
        (val.len()     * 100) / total.max(1),
    );

    (samples, val)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, val)      = split_train_val(items, 0.8, &mut seeded_rng(Some(1)));
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(),   20);
    }

    #[test]
    fn test_train_size_is_floored() {
        // 0.8 * 7 = 5.6 → 5 train, 2 validation
        let items: Vec<usize> = (0..7).collect();
        let (train, val)      = split_train_val(items, 0.8, &mut seeded_rng(None));
        assert_eq!(train.len(), 5);
        assert_eq!(val.len(),   2);
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let items: Vec<usize> = (0..50).collect();
        let (train, val)      = split_train_val(items, 0.8, &mut seeded_rng(Some(7)));
        let train: HashSet<_> = train.into_iter().collect();
        let val:   HashSet<_> = val.into_iter().collect();
        assert!(train.is_disjoint(&val));
        assert_eq!(train.len() + val.len(), 50);
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = split_train_val((0..30).collect::<Vec<usize>>(), 0.8, &mut seeded_rng(Some(42)));
        let b = split_train_val((0..30).collect::<Vec<usize>>(), 0.8, &mut seeded_rng(Some(42)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, val)      = split_train_val(items, 0.8, &mut seeded_rng(Some(0)));
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        let items: Vec<usize> = (0..10).collect();
        let (train, val)      = split_train_val(items, 1.0, &mut seeded_rng(Some(0)));
        assert_eq!(train.len(), 10);
        assert!(val.is_empty());
    }
}
