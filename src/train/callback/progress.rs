//! Progress reporting callback

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};

/// Emits one line per completed epoch with losses and accuracies.
///
/// This is the harness's reporting surface; it observes, never alters,
/// the training run.
#[derive(Clone, Debug, Default)]
pub struct ProgressCallback;

impl ProgressCallback {
    pub fn new() -> Self {
        Self
    }
}

impl TrainerCallback for ProgressCallback {
    fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        let val_str = match (ctx.val_loss, ctx.val_acc) {
            (Some(loss), Some(acc)) => format!(" - val_loss: {loss:.4} - val_acc: {acc:.4}"),
            _ => String::new(),
        };

        println!(
            "Epoch {}/{} - loss: {:.4} - acc: {:.4}{} - lr: {:.2e}",
            ctx.epoch, ctx.max_epochs, ctx.train_loss, ctx.train_acc, val_str, ctx.lr
        );
        CallbackAction::Continue
    }

    fn name(&self) -> &'static str {
        "ProgressCallback"
    }
}
