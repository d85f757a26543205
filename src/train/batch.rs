//! Batch data structure and batch iteration

use crate::autograd::Tensor;
use crate::data::Dataset;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// A mini-batch: flattened input features and class-index targets.
///
/// Targets store class indices as `f32` values, one per example; the loss
/// interprets them against the logit row width.
#[derive(Clone)]
pub struct Batch {
    /// Row-major input features, `size() * feature_dim` values
    pub inputs: Tensor,
    /// One class index per example
    pub targets: Tensor,
}

impl Batch {
    /// Create a new batch
    pub fn new(inputs: Tensor, targets: Tensor) -> Self {
        Self { inputs, targets }
    }

    /// Number of examples in the batch
    pub fn size(&self) -> usize {
        self.targets.len()
    }
}

/// Number of batches one epoch produces: `ceil(len / batch_size)`
pub fn num_batches(len: usize, batch_size: usize) -> usize {
    len.div_ceil(batch_size)
}

/// Iterates a dataset as batches, in sequential or shuffled order.
///
/// Every item appears in exactly one batch per pass; only the final batch
/// may be smaller than `batch_size`.
pub struct BatchIterator<'a> {
    dataset: &'a dyn Dataset,
    order: Vec<usize>,
    batch_size: usize,
    cursor: usize,
}

impl<'a> BatchIterator<'a> {
    /// Iterate in original dataset order
    pub fn sequential(dataset: &'a dyn Dataset, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch size must be positive");
        Self {
            dataset,
            order: (0..dataset.len()).collect(),
            batch_size,
            cursor: 0,
        }
    }

    /// Iterate in a fresh random permutation drawn from `rng`
    pub fn shuffled(dataset: &'a dyn Dataset, batch_size: usize, rng: &mut StdRng) -> Self {
        assert!(batch_size > 0, "batch size must be positive");
        let mut order: Vec<usize> = (0..dataset.len()).collect();
        order.shuffle(rng);
        Self { dataset, order, batch_size, cursor: 0 }
    }
}

impl Iterator for BatchIterator<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.cursor >= self.order.len() {
            return None;
        }
        let end = (self.cursor + self.batch_size).min(self.order.len());
        let indices = &self.order[self.cursor..end];
        self.cursor = end;

        let dim = self.dataset.feature_dim();
        let mut inputs = Vec::with_capacity(indices.len() * dim);
        let mut targets = Vec::with_capacity(indices.len());
        for &idx in indices {
            let (features, label) = self.dataset.get(idx);
            inputs.extend_from_slice(features);
            targets.push(label as f32);
        }

        Some(Batch::new(
            Tensor::from_vec(inputs, false),
            Tensor::from_vec(targets, false),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryDataset;
    use rand::SeedableRng;

    fn dataset(n: usize) -> InMemoryDataset {
        let rows: Vec<Vec<f32>> = (0..n).map(|i| vec![i as f32, -(i as f32)]).collect();
        let labels: Vec<usize> = (0..n).map(|i| i % 3).collect();
        InMemoryDataset::new(rows, labels).unwrap()
    }

    #[test]
    fn test_batch_sizes_100_over_32() {
        let ds = dataset(100);
        let sizes: Vec<usize> =
            BatchIterator::sequential(&ds, 32).map(|b| b.size()).collect();
        assert_eq!(sizes, vec![32, 32, 32, 4]);
        assert_eq!(num_batches(100, 32), 4);
    }

    #[test]
    fn test_batch_larger_than_dataset_yields_one_batch() {
        let ds = dataset(5);
        let batches: Vec<Batch> = BatchIterator::sequential(&ds, 64).collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].size(), 5);
    }

    #[test]
    fn test_sequential_preserves_order() {
        let ds = dataset(7);
        let batches: Vec<Batch> = BatchIterator::sequential(&ds, 3).collect();
        let mut seen = Vec::new();
        for b in &batches {
            for &f in b.inputs.data().iter().step_by(2) {
                seen.push(f as usize);
            }
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_shuffled_covers_every_item_once() {
        let ds = dataset(50);
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = vec![0usize; 50];
        let mut total = 0;
        for b in BatchIterator::shuffled(&ds, 8, &mut rng) {
            total += b.size();
            for &f in b.inputs.data().iter().step_by(2) {
                seen[f as usize] += 1;
            }
        }
        assert_eq!(total, 50);
        assert!(seen.iter().all(|&c| c == 1), "some item skipped or duplicated");
    }

    #[test]
    fn test_shuffled_permutation_changes_between_draws() {
        let ds = dataset(32);
        let mut rng = StdRng::seed_from_u64(9);
        let first: Vec<f32> = BatchIterator::shuffled(&ds, 32, &mut rng)
            .next()
            .unwrap()
            .inputs
            .data()
            .to_vec();
        let second: Vec<f32> = BatchIterator::shuffled(&ds, 32, &mut rng)
            .next()
            .unwrap()
            .inputs
            .data()
            .to_vec();
        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_dataset_yields_no_batches() {
        let ds = InMemoryDataset::empty(2);
        assert_eq!(BatchIterator::sequential(&ds, 4).count(), 0);
    }

    #[test]
    #[should_panic(expected = "batch size must be positive")]
    fn test_zero_batch_size_rejected() {
        let ds = dataset(4);
        let _ = BatchIterator::sequential(&ds, 0);
    }
}
