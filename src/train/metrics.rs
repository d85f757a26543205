//! Metric accumulation

use crate::autograd::Tensor;
use crate::{Error, Result};

/// Argmax class per row of a `(rows, classes)` logit matrix
pub fn argmax_rows(logits: &Tensor, classes: usize) -> Vec<usize> {
    assert!(classes > 0, "class count must be positive");
    let data = logits.data();
    assert_eq!(data.len() % classes, 0, "logit count must be a multiple of class count");

    data.as_slice()
        .expect("logits must be contiguous")
        .chunks(classes)
        .map(|row| {
            row.iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(i, _)| i)
                .unwrap_or(0)
        })
        .collect()
}

/// Count of rows whose argmax matches the target class index
pub(crate) fn correct_predictions(logits: &Tensor, targets: &Tensor) -> usize {
    let rows = targets.len();
    if rows == 0 {
        return 0;
    }
    let classes = logits.len() / rows;
    let predicted = argmax_rows(logits, classes);
    let target_data = targets.data();
    predicted
        .iter()
        .zip(target_data.iter())
        .filter(|(&p, &t)| p == t as usize)
        .count()
}

/// A named scalar metric accumulated over batches of a phase
pub trait Metric {
    /// Metric name for reporting
    fn name(&self) -> &str;

    /// Fold one batch of predictions/targets into the running value
    fn update(&mut self, predictions: &Tensor, targets: &Tensor);

    /// The accumulated scalar
    fn finalize(&self) -> f32;

    /// Clear state for the next phase
    fn reset(&mut self);
}

/// Fraction of examples whose argmax prediction matches the label
#[derive(Debug, Clone, Default)]
pub struct Accuracy {
    correct: usize,
    seen: usize,
}

impl Accuracy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Metric for Accuracy {
    fn name(&self) -> &str {
        "acc"
    }

    fn update(&mut self, predictions: &Tensor, targets: &Tensor) {
        self.correct += correct_predictions(predictions, targets);
        self.seen += targets.len();
    }

    fn finalize(&self) -> f32 {
        if self.seen == 0 {
            return 0.0;
        }
        self.correct as f32 / self.seen as f32
    }

    fn reset(&mut self) {
        self.correct = 0;
        self.seen = 0;
    }
}

/// Phase-level accumulator for mean loss and accuracy.
///
/// The loss mean is maintained incrementally (weighted running mean) so a
/// long epoch never sums unbounded totals. Finalization with zero items is
/// an error, not a NaN.
#[derive(Debug, Clone, Default)]
pub struct MetricAccumulator {
    mean_loss: f32,
    correct: usize,
    count: usize,
}

impl MetricAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear state at the start of a phase
    pub fn reset(&mut self) {
        self.mean_loss = 0.0;
        self.correct = 0;
        self.count = 0;
    }

    /// Fold one batch: its mean loss, correct-prediction count, and size
    pub fn update(&mut self, batch_loss: f32, correct: usize, batch_size: usize) {
        if batch_size == 0 {
            return;
        }
        self.count += batch_size;
        self.mean_loss += (batch_loss - self.mean_loss) * (batch_size as f32 / self.count as f32);
        self.correct += correct;
    }

    /// Items folded so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Phase means as `(loss, accuracy)`; errors if nothing was folded
    pub fn finalize(&self) -> Result<(f32, f32)> {
        if self.count == 0 {
            return Err(Error::EmptyDataset);
        }
        Ok((self.mean_loss, self.correct as f32 / self.count as f32))
    }
}
