//! Optimizer trait

use crate::autograd::Tensor;

/// A gradient-descent update rule.
///
/// An optimizer holds non-owning handles to module parameters only for the
/// duration of a `step` call; moment state is keyed by parameter position.
pub trait Optimizer {
    /// Apply one update step using the parameters' current gradients
    fn step(&mut self, params: &mut [Tensor]);

    /// Clear accumulated gradients on all parameters
    fn zero_grad(&mut self, params: &mut [Tensor]) {
        for param in params {
            param.zero_grad();
        }
    }

    /// Current learning rate
    fn lr(&self) -> f32;

    /// Replace the learning rate (used by schedulers)
    fn set_lr(&mut self, lr: f32);
}
