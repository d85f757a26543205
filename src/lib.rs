//! ajustar — a Keras-style training and evaluation harness
//!
//! This crate layers a high-level object model over a compact tape-based
//! autograd engine: construct a network, compile it with a loss function
//! and optimizer, fit it over mini-batches with validation and metric
//! tracking, evaluate and predict, and persist trained parameters to a
//! named artifact.
//!
//! The harness is architecture-agnostic: anything implementing
//! [`nn::Module`] — a forward transform, an enumerable parameter set, and
//! a train/inference mode toggle — can be trained. [`nn::Mlp`] is the
//! bundled fully connected classifier.
//!
//! # Example
//!
//! ```
//! use ajustar::data::InMemoryDataset;
//! use ajustar::nn::Mlp;
//! use ajustar::optim::SGD;
//! use ajustar::train::{CrossEntropyLoss, FitConfig, Model};
//!
//! // Two separable clusters in 2-D
//! let rows: Vec<Vec<f32>> = (0..20)
//!     .map(|i| if i % 2 == 0 { vec![1.0, 1.0] } else { vec![-1.0, -1.0] })
//!     .collect();
//! let labels: Vec<usize> = (0..20).map(|i| i % 2).collect();
//! let dataset = InMemoryDataset::new(rows, labels).unwrap();
//!
//! let net = Mlp::new(&[2, 8, 2], 0.0, 123);
//! let mut model = Model::new(net, FitConfig::new().with_batch_size(4).with_verbose(false));
//! model.compile(Box::new(CrossEntropyLoss), Box::new(SGD::new(0.1, 0.0)));
//!
//! let history = model.fit(&dataset, None, None, 5).unwrap();
//! assert_eq!(history.len(), 5);
//!
//! let (loss, acc) = model.evaluate(&dataset).unwrap();
//! assert!(loss.is_finite());
//! assert!((0.0..=1.0).contains(&acc));
//! ```

pub mod autograd;
pub mod data;
mod error;
pub mod io;
pub mod nn;
pub mod optim;
pub mod train;

pub use autograd::Tensor;
pub use error::{Error, Result};
pub use train::{FitConfig, History, Model};
