//! Fully connected classifier

use super::{Dropout, Linear, Module, Param};
use crate::autograd::{relu, Tensor};
use crate::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A multi-layer perceptron emitting unnormalized logits.
///
/// Hidden layers use ReLU followed by optional dropout; the final layer is
/// affine only, so this composes with a softmax-based loss. The default
/// digit-classifier configuration is `Mlp::new(&[784, 128, 64, 10], 0.1,
/// seed)`.
pub struct Mlp {
    layers: Vec<Linear>,
    dropout: Option<Dropout>,
    dims: Vec<usize>,
    training: bool,
}

impl Mlp {
    /// Build a network from layer widths, e.g. `&[784, 128, 64, 10]`.
    ///
    /// `dropout_p` of 0.0 disables dropout entirely. The seed fixes both
    /// weight initialization and the dropout mask stream.
    pub fn new(dims: &[usize], dropout_p: f32, seed: u64) -> Self {
        assert!(dims.len() >= 2, "at least input and output widths are required");

        let mut rng = StdRng::seed_from_u64(seed);
        let layers: Vec<Linear> =
            dims.windows(2).map(|w| Linear::new(w[0], w[1], &mut rng)).collect();

        let dropout = if dropout_p > 0.0 {
            Some(Dropout::new(dropout_p, seed.wrapping_add(1)))
        } else {
            None
        };

        Self { layers, dropout, dims: dims.to_vec(), training: true }
    }

    fn layer_name(&self, index: usize) -> String {
        if index + 1 == self.layers.len() {
            "out".to_string()
        } else {
            format!("fc{}", index + 1)
        }
    }
}

impl Module for Mlp {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let last = self.layers.len() - 1;
        let mut x = input.clone();
        for (i, layer) in self.layers.iter().enumerate() {
            x = layer.forward(&x)?;
            if i < last {
                x = relu(&x);
                if let Some(dropout) = &self.dropout {
                    x = dropout.forward(&x);
                }
            }
        }
        Ok(x)
    }

    fn parameters(&self) -> Vec<Param> {
        let mut params = Vec::with_capacity(self.layers.len() * 2);
        for (i, layer) in self.layers.iter().enumerate() {
            let name = self.layer_name(i);
            params.push(Param::new(
                format!("{name}.weight"),
                vec![layer.in_features(), layer.out_features()],
                layer.weight().clone(),
            ));
            params.push(Param::new(
                format!("{name}.bias"),
                vec![layer.out_features()],
                layer.bias().clone(),
            ));
        }
        params
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
        if let Some(dropout) = &mut self.dropout {
            dropout.set_training(training);
        }
    }

    fn input_dim(&self) -> usize {
        self.dims[0]
    }

    fn output_dim(&self) -> usize {
        *self.dims.last().expect("dims is non-empty")
    }

    fn architecture(&self) -> String {
        let widths: Vec<String> = self.dims.iter().map(ToString::to_string).collect();
        format!("mlp-{}", widths.join("x"))
    }
}
