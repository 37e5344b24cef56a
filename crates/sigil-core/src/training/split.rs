//! Deterministic train/validation split.

use crate::training::rng::Lcg;

/// Shuffles `0..len` with the given seed and cuts at
/// `floor(train_fraction * len)`.
///
/// Guarantees: the two index sets are disjoint, their union is `0..len`,
/// and the same `(len, train_fraction, seed)` triple always reproduces the
/// same split.
pub fn split_indices(len: usize, train_fraction: f64, seed: u64) -> (Vec<u32>, Vec<u32>) {
    let mut indices: Vec<u32> = (0..len as u32).collect();

    // Fisher-Yates driven by the seeded LCG.
    let mut rng = Lcg::new(seed);
    for i in (1..indices.len()).rev() {
        let j = rng.next_index(i + 1);
        indices.swap(i, j);
    }

    let cut = (train_fraction * len as f64).floor() as usize;
    let cut = cut.min(len);
    let validation = indices.split_off(cut);
    (indices, validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_union_is_full_and_disjoint() {
        for len in [0usize, 1, 5, 100, 257] {
            let (train, val) = split_indices(len, 0.8, 42);
            assert_eq!(train.len() + val.len(), len);

            let train_set: HashSet<u32> = train.iter().copied().collect();
            let val_set: HashSet<u32> = val.iter().copied().collect();
            assert!(train_set.is_disjoint(&val_set));

            let mut union: Vec<u32> = train_set.union(&val_set).copied().collect();
            union.sort_unstable();
            let expected: Vec<u32> = (0..len as u32).collect();
            assert_eq!(union, expected);
        }
    }

    #[test]
    fn test_same_seed_reproduces_split() {
        let (train_a, val_a) = split_indices(200, 0.8, 7);
        let (train_b, val_b) = split_indices(200, 0.8, 7);
        assert_eq!(train_a, train_b);
        assert_eq!(val_a, val_b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let (train_a, _) = split_indices(200, 0.8, 1);
        let (train_b, _) = split_indices(200, 0.8, 2);
        assert_ne!(train_a, train_b);
    }

    #[test]
    fn test_ratio_controls_cut() {
        let (train, val) = split_indices(100, 0.8, 42);
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(), 20);

        let (train, val) = split_indices(10, 0.5, 42);
        assert_eq!(train.len(), 5);
        assert_eq!(val.len(), 5);
    }

    #[test]
    fn test_full_ratio_leaves_empty_validation() {
        let (train, val) = split_indices(9, 1.0, 3);
        assert_eq!(train.len(), 9);
        assert!(val.is_empty());
    }

    #[test]
    fn test_split_is_actually_shuffled() {
        let (train, _) = split_indices(100, 0.8, 42);
        let sorted: Vec<u32> = (0..80).collect();
        assert_ne!(train, sorted);
    }
}
