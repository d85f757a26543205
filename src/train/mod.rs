//! High-level training harness
//!
//! This module provides the Keras-style object model over the autograd
//! engine:
//! - `Model`: compile → fit → evaluate → predict → persist
//! - Loss functions (cross-entropy, MSE)
//! - Metric accumulation with running means
//! - Batch iteration with per-epoch shuffling
//! - Epoch history for plotting
//! - Callbacks for progress reporting and cooperative interruption
//!
//! # Example
//!
//! ```no_run
//! use ajustar::data::InMemoryDataset;
//! use ajustar::nn::Mlp;
//! use ajustar::optim::{AdamW, StepDecayLR};
//! use ajustar::train::{CrossEntropyLoss, FitConfig, Model};
//!
//! let net = Mlp::new(&[784, 128, 64, 10], 0.1, 123);
//! let mut model = Model::new(net, FitConfig::default());
//! model.compile(Box::new(CrossEntropyLoss), Box::new(AdamW::new(0.01, 0.9, 0.999, 1e-8, 0.001)));
//!
//! # let train_set: InMemoryDataset = todo!();
//! # let val_set: InMemoryDataset = todo!();
//! let mut scheduler = StepDecayLR::new(0.01, 5, 0.1);
//! let history = model
//!     .fit(&train_set, Some(&val_set), Some(&mut scheduler), 25)
//!     .expect("training failed");
//! let (loss, acc) = model.evaluate(&val_set).expect("evaluation failed");
//! model.save("mnist_dnn.json").expect("save failed");
//! ```

mod batch;
pub mod callback;
mod config;
mod history;
mod loss;
mod metrics;
mod model;

pub use batch::{num_batches, Batch, BatchIterator};
pub use callback::{CallbackAction, CallbackContext, CallbackManager, ProgressCallback, TrainerCallback};
pub use config::FitConfig;
pub use history::{EpochRecord, History};
pub use loss::{CrossEntropyLoss, LossFn, MSELoss};
pub use metrics::{Accuracy, Metric, MetricAccumulator};
pub use model::Model;
