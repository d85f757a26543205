//! Fully connected layer

use crate::autograd::{add_bias, matmul, Tensor};
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::Rng;

/// A dense layer computing `y = x @ W + b` over a batch.
///
/// The weight is stored as (in_features, out_features) row-major so the
/// batch matmul needs no transposition on the forward path.
pub struct Linear {
    weight: Tensor,
    bias: Tensor,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Create a layer with He-style uniform initialization
    pub fn new(in_features: usize, out_features: usize, rng: &mut StdRng) -> Self {
        assert!(in_features > 0 && out_features > 0, "layer dimensions must be positive");

        let scale = (2.0 / in_features as f32).sqrt();
        let weight_data: Vec<f32> = (0..in_features * out_features)
            .map(|_| rng.random::<f32>() * scale - scale / 2.0)
            .collect();

        Self {
            weight: Tensor::from_vec(weight_data, true),
            bias: Tensor::zeros(out_features, true),
            in_features,
            out_features,
        }
    }

    /// Batched forward pass: (batch, in) -> (batch, out)
    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        if input.is_empty() || input.len() % self.in_features != 0 {
            return Err(Error::ShapeMismatch {
                expected: self.in_features,
                actual: input.len(),
            });
        }
        let batch = input.len() / self.in_features;

        let h = matmul(input, &self.weight, batch, self.in_features, self.out_features);
        Ok(add_bias(&h, &self.bias, batch, self.out_features))
    }

    /// Shared handle to the weight matrix
    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    /// Shared handle to the bias vector
    pub fn bias(&self) -> &Tensor {
        &self.bias
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }
}
