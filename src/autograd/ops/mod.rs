//! Differentiable operations on tensors

mod activations;
mod matmul;

pub use activations::{dropout, relu};
pub use matmul::{add_bias, matmul, transpose};
