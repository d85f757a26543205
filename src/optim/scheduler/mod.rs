//! Learning rate schedulers
//!
//! Schedules are advanced once per completed epoch; the training loop
//! applies the resulting rate to the optimizer before the next epoch.

mod cosine_annealing;
mod step_decay;

pub use cosine_annealing::CosineAnnealingLR;
pub use step_decay::StepDecayLR;

use crate::optim::Optimizer;

/// A learning-rate schedule over epochs
pub trait LRScheduler {
    /// The rate the schedule currently prescribes
    fn get_lr(&self) -> f32;

    /// Advance the schedule by one epoch
    fn step(&mut self);

    /// Push the current rate into an optimizer
    fn apply(&self, optimizer: &mut dyn Optimizer) {
        optimizer.set_lr(self.get_lr());
    }
}
