//! Mean squared error loss

use super::LossFn;
use crate::autograd::{BackwardOp, Tensor};
use ndarray::Array1;
use std::cell::RefCell;
use std::rc::Rc;

/// MSE over element-aligned predictions and targets.
///
/// L = mean((pred - target)²), gradient 2 * (pred - target) / n.
pub struct MSELoss;

impl LossFn for MSELoss {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        assert_eq!(
            predictions.len(),
            targets.len(),
            "predictions and targets must have the same length"
        );
        assert!(!predictions.is_empty(), "predictions must be non-empty");

        let n = predictions.len() as f32;
        let diff = predictions.data() - targets.data();
        let mse = diff.iter().map(|&d| d * d).sum::<f32>() / n;

        let mut loss = Tensor::from_vec(vec![mse], predictions.requires_grad());

        if predictions.requires_grad() {
            loss.set_backward_op(Rc::new(MseBackward {
                predictions: predictions.clone(),
                grad: &diff * (2.0 / n),
                result_grad: loss.grad_cell(),
            }));
        }

        loss
    }

    fn name(&self) -> &'static str {
        "mse"
    }
}

struct MseBackward {
    predictions: Tensor,
    grad: Array1<f32>,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for MseBackward {
    fn backward(&self) {
        if let Some(grad_output) = self.result_grad.borrow().as_ref() {
            self.predictions.accumulate_grad(&self.grad * grad_output[0]);

            if let Some(op) = self.predictions.backward_op() {
                op.backward();
            }
        }
    }
}
