//! Loss function trait

use crate::autograd::Tensor;

/// Trait for loss functions
pub trait LossFn {
    /// Compute a scalar loss from predictions and targets.
    ///
    /// The returned tensor holds a single value and carries the backward
    /// op that propagates gradients into the predictions.
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor;

    /// Name of the loss function
    fn name(&self) -> &str;
}
