//! Callback trait and context types

/// Snapshot of training state passed to callbacks
#[derive(Clone, Debug, Default)]
pub struct CallbackContext {
    /// Current epoch (1-based once training has started)
    pub epoch: usize,
    /// Total epochs planned
    pub max_epochs: usize,
    /// Current batch within the epoch
    pub step: usize,
    /// Batches per epoch
    pub steps_per_epoch: usize,
    /// Running training loss for the phase
    pub train_loss: f32,
    /// Running training accuracy for the phase
    pub train_acc: f32,
    /// Validation loss, when a validation pass ran
    pub val_loss: Option<f32>,
    /// Validation accuracy, when a validation pass ran
    pub val_acc: Option<f32>,
    /// Current learning rate
    pub lr: f32,
}

/// Action requested by a callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    /// Continue training normally
    Continue,
    /// Stop at the next batch or epoch boundary
    Stop,
}

/// Hooks into training events.
///
/// All methods default to no-ops that continue, so implementors only
/// override the events they care about. Returning
/// [`CallbackAction::Stop`] ends training cooperatively: the loop checks
/// only at batch and epoch boundaries, never mid-batch, and an interrupted
/// epoch records no history entry.
pub trait TrainerCallback {
    /// Called once before the first epoch
    fn on_train_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called once after training ends
    fn on_train_end(&mut self, _ctx: &CallbackContext) {}

    /// Called before each epoch
    fn on_epoch_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called after each completed epoch
    fn on_epoch_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called after each training batch
    fn on_step_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Callback name for diagnostics
    fn name(&self) -> &'static str {
        "TrainerCallback"
    }
}
