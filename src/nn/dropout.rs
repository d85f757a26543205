//! Dropout regularization layer

use crate::autograd::{self, Tensor};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;

/// Inverted dropout with an explicit mode flag and a private random stream.
///
/// In training mode each element is zeroed with probability `p` and the
/// survivors are scaled by `1/(1-p)`. In inference mode the layer is a
/// deterministic identity pass-through. The mask stream is owned by the
/// layer and seeded at construction, so a fixed seed yields a fixed mask
/// sequence.
pub struct Dropout {
    p: f32,
    training: bool,
    rng: RefCell<StdRng>,
}

impl Dropout {
    /// Create a dropout layer with drop probability `p` in `[0, 1)`
    pub fn new(p: f32, seed: u64) -> Self {
        assert!((0.0..1.0).contains(&p), "drop probability must be in [0, 1)");
        Self {
            p,
            training: true,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Toggle between training (stochastic) and inference (identity) mode
    pub fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    pub fn p(&self) -> f32 {
        self.p
    }

    /// Apply dropout according to the current mode
    pub fn forward(&self, input: &Tensor) -> Tensor {
        if !self.training || self.p == 0.0 {
            return input.clone();
        }

        let keep = 1.0 - self.p;
        let mut rng = self.rng.borrow_mut();
        let mask: Array1<f32> = (0..input.len())
            .map(|_| if rng.random::<f32>() < keep { 1.0 / keep } else { 0.0 })
            .collect();
        autograd::dropout(input, &mask)
    }
}
