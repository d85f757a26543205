//! Training callbacks: reporting and cooperative interruption

mod progress;
mod traits;

pub use progress::ProgressCallback;
pub use traits::{CallbackAction, CallbackContext, TrainerCallback};

/// Dispatches training events to registered callbacks in order.
///
/// A `Stop` from any callback wins over `Continue` from the rest.
#[derive(Default)]
pub struct CallbackManager {
    callbacks: Vec<Box<dyn TrainerCallback>>,
}

impl CallbackManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn on_train_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.fire(|cb| cb.on_train_begin(ctx))
    }

    pub fn on_train_end(&mut self, ctx: &CallbackContext) {
        for cb in &mut self.callbacks {
            cb.on_train_end(ctx);
        }
    }

    pub fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.fire(|cb| cb.on_epoch_begin(ctx))
    }

    pub fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.fire(|cb| cb.on_epoch_end(ctx))
    }

    pub fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.fire(|cb| cb.on_step_end(ctx))
    }

    fn fire<F>(&mut self, mut event: F) -> CallbackAction
    where
        F: FnMut(&mut Box<dyn TrainerCallback>) -> CallbackAction,
    {
        let mut action = CallbackAction::Continue;
        for cb in &mut self.callbacks {
            if event(cb) == CallbackAction::Stop {
                action = CallbackAction::Stop;
            }
        }
        action
    }
}
