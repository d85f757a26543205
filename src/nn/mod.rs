//! Trainable modules
//!
//! A module is a parameterized function: a deterministic forward transform
//! plus an ordered, stably named parameter set. Anything implementing
//! [`Module`] can be driven by the harness; no inheritance hierarchy is
//! involved.

mod dropout;
mod linear;
mod mlp;

pub use dropout::Dropout;
pub use linear::Linear;
pub use mlp::Mlp;

use crate::autograd::Tensor;
use crate::Result;

/// A named parameter with its logical shape.
///
/// The tensor handle shares storage with the module, so optimizer updates
/// through it are visible to subsequent forward passes.
#[derive(Clone)]
pub struct Param {
    /// Stable parameter name, e.g. `fc1.weight`
    pub name: String,
    /// Logical shape; the tensor stores the row-major flattening
    pub shape: Vec<usize>,
    /// Shared handle to the values
    pub tensor: Tensor,
}

impl Param {
    pub fn new(name: impl Into<String>, shape: Vec<usize>, tensor: Tensor) -> Self {
        Self { name: name.into(), shape, tensor }
    }

    /// Number of scalar values in this parameter
    pub fn count(&self) -> usize {
        self.shape.iter().product()
    }
}

/// A trainable module: forward computation over a flattened batch plus an
/// enumerable parameter set and a train/inference mode toggle.
pub trait Module {
    /// Compute output logits for a batch.
    ///
    /// `input` holds `batch_size * input_dim` values row-major; the output
    /// holds `batch_size * output_dim` values. Parameter shapes never
    /// change across calls.
    fn forward(&self, input: &Tensor) -> Result<Tensor>;

    /// Ordered, stable-iteration-order parameter list
    fn parameters(&self) -> Vec<Param>;

    /// Toggle training mode; only stochastic regularization (dropout)
    /// behaves differently between modes.
    fn set_training(&mut self, training: bool);

    /// Expected feature count per example
    fn input_dim(&self) -> usize;

    /// Produced logit count per example
    fn output_dim(&self) -> usize;

    /// Short architecture identity recorded in persisted artifacts
    fn architecture(&self) -> String;
}
