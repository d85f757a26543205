//! The Keras-style model harness

use crate::autograd::{self, Tensor};
use crate::data::Dataset;
use crate::io::{load_state, save_state, ArtifactFormat, ModelState, SaveConfig};
use crate::nn::Module;
use crate::optim::{clip_grad_norm, LRScheduler, Optimizer};
use crate::train::callback::{
    CallbackAction, CallbackContext, CallbackManager, ProgressCallback, TrainerCallback,
};
use crate::train::metrics::{argmax_rows, correct_predictions};
use crate::train::{
    num_batches, BatchIterator, EpochRecord, FitConfig, History, LossFn, MetricAccumulator,
};
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::Write as _;
use std::path::Path;

/// Owns a trainable module and drives it through training, evaluation,
/// prediction, and persistence.
///
/// The lifecycle mirrors the usual high-level API: construct with a module
/// and a [`FitConfig`], bind a loss function and optimizer with
/// [`compile`](Model::compile), then call [`fit`](Model::fit),
/// [`evaluate`](Model::evaluate), [`predict`](Model::predict), and
/// [`save`](Model::save)/[`load_weights`](Model::load_weights).
///
/// `fit` and `evaluate` require a compiled model; `predict` only needs
/// parameters, trained or loaded. Parameters are mutated exclusively by the
/// optimizer during `fit`'s training phase; every other operation treats
/// them as read-only.
pub struct Model<M: Module> {
    module: M,
    loss_fn: Option<Box<dyn LossFn>>,
    optimizer: Option<Box<dyn Optimizer>>,
    config: FitConfig,
    history: History,
    callbacks: CallbackManager,
    rng: StdRng,
}

impl<M: Module> Model<M> {
    /// Wrap a module; the shuffle stream is seeded from the config
    pub fn new(module: M, config: FitConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let mut callbacks = CallbackManager::new();
        if config.verbose {
            callbacks.add(ProgressCallback::new());
        }
        Self {
            module,
            loss_fn: None,
            optimizer: None,
            config,
            history: History::new(),
            callbacks,
            rng,
        }
    }

    /// Construct a model and restore its parameters from an artifact
    pub fn from_artifact(module: M, config: FitConfig, path: impl AsRef<Path>) -> Result<Self> {
        let mut model = Self::new(module, config);
        model.load_weights(path)?;
        Ok(model)
    }

    /// Bind the loss function and optimizer
    pub fn compile(&mut self, loss_fn: Box<dyn LossFn>, optimizer: Box<dyn Optimizer>) {
        self.loss_fn = Some(loss_fn);
        self.optimizer = Some(optimizer);
    }

    /// Whether a loss function and optimizer are bound
    pub fn is_compiled(&self) -> bool {
        self.loss_fn.is_some() && self.optimizer.is_some()
    }

    /// The wrapped module
    pub fn module(&self) -> &M {
        &self.module
    }

    /// Register an additional training callback
    pub fn add_callback<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.add(callback);
    }

    /// History recorded by the most recent `fit` call
    pub fn history(&self) -> &History {
        &self.history
    }

    fn current_lr(&self) -> f32 {
        self.optimizer.as_ref().map_or(0.0, |o| o.lr())
    }

    /// Train for `epochs` full passes over `train_set`.
    ///
    /// Each epoch shuffles the training set with a fresh permutation, runs
    /// forward/backward/update per batch, then (if `val_set` is given) one
    /// inference-mode pass in original order, then advances the scheduler
    /// exactly once. One [`EpochRecord`] is appended per completed epoch;
    /// an epoch interrupted by a callback appends nothing.
    ///
    /// Returns the full history (one record per epoch when uninterrupted).
    pub fn fit(
        &mut self,
        train_set: &dyn Dataset,
        val_set: Option<&dyn Dataset>,
        mut scheduler: Option<&mut dyn LRScheduler>,
        epochs: usize,
    ) -> Result<History> {
        if !self.is_compiled() {
            return Err(Error::NotCompiled);
        }
        if train_set.is_empty() {
            return Err(Error::EmptyDataset);
        }
        if let Some(val) = val_set {
            if val.is_empty() {
                return Err(Error::EmptyDataset);
            }
        }

        // Each fit call records its own run
        self.history = History::new();

        let mut params: Vec<Tensor> =
            self.module.parameters().into_iter().map(|p| p.tensor).collect();
        let steps_per_epoch = num_batches(train_set.len(), self.config.batch_size);

        let ctx = CallbackContext {
            max_epochs: epochs,
            steps_per_epoch,
            lr: self.current_lr(),
            ..Default::default()
        };
        if self.callbacks.on_train_begin(&ctx) == CallbackAction::Stop {
            return Ok(self.history.clone());
        }

        let mut interrupted = false;
        for epoch in 1..=epochs {
            let ctx = CallbackContext {
                epoch,
                max_epochs: epochs,
                steps_per_epoch,
                lr: self.current_lr(),
                ..Default::default()
            };
            if self.callbacks.on_epoch_begin(&ctx) == CallbackAction::Stop {
                break;
            }

            // Training phase: fresh permutation, per-batch updates
            self.module.set_training(true);
            let mut accumulator = MetricAccumulator::new();

            let mut step = 0;
            for batch in
                BatchIterator::shuffled(train_set, self.config.batch_size, &mut self.rng)
            {
                let logits = self.module.forward(&batch.inputs)?;
                let loss_fn = self.loss_fn.as_ref().ok_or(Error::NotCompiled)?;
                let mut loss = loss_fn.forward(&logits, &batch.targets);
                let loss_val = loss.data()[0];

                autograd::backward(&mut loss, None);

                if let Some(max_norm) = self.config.max_grad_norm {
                    clip_grad_norm(&mut params, max_norm);
                }

                let optimizer = self.optimizer.as_mut().ok_or(Error::NotCompiled)?;
                optimizer.step(&mut params);
                optimizer.zero_grad(&mut params);

                let correct = correct_predictions(&logits, &batch.targets);
                accumulator.update(loss_val, correct, batch.size());
                step += 1;

                // Interruption is checked at batch boundaries only, so an
                // in-flight update is never torn
                let ctx = CallbackContext {
                    epoch,
                    max_epochs: epochs,
                    step,
                    steps_per_epoch,
                    lr: self.current_lr(),
                    ..Default::default()
                };
                if self.callbacks.on_step_end(&ctx) == CallbackAction::Stop {
                    interrupted = true;
                    break;
                }
            }
            if interrupted {
                break;
            }

            let (train_loss, train_acc) = accumulator.finalize()?;

            // Validation phase: inference mode, original order, no updates
            let mut val_metrics = None;
            if let Some(val) = val_set {
                self.module.set_training(false);
                let mut val_accumulator = MetricAccumulator::new();
                for batch in BatchIterator::sequential(val, self.config.batch_size) {
                    let logits = self.module.forward(&batch.inputs)?;
                    let loss_fn = self.loss_fn.as_ref().ok_or(Error::NotCompiled)?;
                    let loss = loss_fn.forward(&logits, &batch.targets);
                    let correct = correct_predictions(&logits, &batch.targets);
                    val_accumulator.update(loss.data()[0], correct, batch.size());
                }
                self.module.set_training(true);
                val_metrics = Some(val_accumulator.finalize()?);
            }

            // Schedule advances once per completed epoch, after validation
            if let Some(sched) = scheduler.as_mut() {
                sched.step();
                if let Some(optimizer) = self.optimizer.as_deref_mut() {
                    sched.apply(optimizer);
                }
            }

            let (val_loss, val_acc) = match val_metrics {
                Some((loss, acc)) => (Some(loss), Some(acc)),
                None => (None, None),
            };
            self.history.push(EpochRecord { epoch, train_loss, train_acc, val_loss, val_acc });

            let ctx = CallbackContext {
                epoch,
                max_epochs: epochs,
                step: steps_per_epoch,
                steps_per_epoch,
                train_loss,
                train_acc,
                val_loss,
                val_acc,
                lr: self.current_lr(),
            };
            if self.callbacks.on_epoch_end(&ctx) == CallbackAction::Stop {
                break;
            }
        }

        let ctx = CallbackContext {
            epoch: self.history.len(),
            max_epochs: epochs,
            lr: self.current_lr(),
            ..Default::default()
        };
        self.callbacks.on_train_end(&ctx);

        Ok(self.history.clone())
    }

    /// Mean loss and accuracy over a full dataset, in original order,
    /// without gradient computation or parameter updates
    pub fn evaluate(&mut self, dataset: &dyn Dataset) -> Result<(f32, f32)> {
        if !self.is_compiled() {
            return Err(Error::NotCompiled);
        }
        if dataset.is_empty() {
            return Err(Error::EmptyDataset);
        }

        self.module.set_training(false);
        let mut accumulator = MetricAccumulator::new();
        for batch in BatchIterator::sequential(dataset, self.config.batch_size) {
            let logits = self.module.forward(&batch.inputs)?;
            let loss_fn = self.loss_fn.as_ref().ok_or(Error::NotCompiled)?;
            let loss = loss_fn.forward(&logits, &batch.targets);
            let correct = correct_predictions(&logits, &batch.targets);
            accumulator.update(loss.data()[0], correct, batch.size());
        }

        accumulator.finalize()
    }

    /// Argmax class per example for one input batch.
    ///
    /// Runs in inference mode and needs no bound loss or optimizer.
    pub fn predict(&mut self, input: &Tensor) -> Result<Vec<usize>> {
        self.module.set_training(false);
        let logits = self.module.forward(input)?;
        Ok(argmax_rows(&logits, self.module.output_dim()))
    }

    /// Predictions and true labels over a full dataset, aligned and in
    /// original order; both returned vectors have `dataset.len()` entries.
    pub fn predict_dataset(&mut self, dataset: &dyn Dataset) -> Result<(Vec<usize>, Vec<usize>)> {
        self.module.set_training(false);
        let mut predictions = Vec::with_capacity(dataset.len());
        let mut labels = Vec::with_capacity(dataset.len());

        for batch in BatchIterator::sequential(dataset, self.config.batch_size) {
            let logits = self.module.forward(&batch.inputs)?;
            predictions.extend(argmax_rows(&logits, self.module.output_dim()));
            labels.extend(batch.targets.data().iter().map(|&t| t as usize));
        }

        Ok((predictions, labels))
    }

    /// Persist current parameter values to a named artifact.
    ///
    /// The format follows the file extension (`.json`/`.yaml`), defaulting
    /// to JSON. An existing artifact is replaced atomically.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        let state = ModelState::from_params(
            &name,
            &self.module.architecture(),
            &self.module.parameters(),
        );

        let format = path
            .extension()
            .and_then(|s| s.to_str())
            .and_then(ArtifactFormat::from_extension)
            .unwrap_or(ArtifactFormat::Json);

        save_state(&state, path, &SaveConfig::new(format))
    }

    /// Restore parameter values from an artifact.
    ///
    /// The artifact's parameter name→shape mapping must match the module
    /// exactly; any difference fails with
    /// [`Error::StructuralMismatch`] before a single value is written.
    pub fn load_weights(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let state = load_state(path)?;
        let params = self.module.parameters();
        state.validate_against(&params)?;
        state.apply_to(&params)
    }

    /// Keras-like parameter table
    pub fn summary(&self) -> String {
        let params = self.module.parameters();
        let mut out = String::new();
        let _ = writeln!(out, "Model: {}", self.module.architecture());
        let _ = writeln!(out, "{:<24} {:<16} {:>12}", "Parameter", "Shape", "Count");

        let mut total = 0usize;
        for p in &params {
            let dims: Vec<String> = p.shape.iter().map(ToString::to_string).collect();
            let shape = format!("({})", dims.join(", "));
            let _ = writeln!(out, "{:<24} {:<16} {:>12}", p.name, shape, p.count());
            total += p.count();
        }
        let _ = writeln!(out, "Total trainable parameters: {total}");
        out
    }
}
