//! Cross-entropy loss for classification

use super::LossFn;
use crate::autograd::{BackwardOp, Tensor};
use ndarray::Array1;
use std::cell::RefCell;
use std::rc::Rc;

/// Softmax cross-entropy over a batch of logit rows.
///
/// Predictions hold `batch * classes` unnormalized logits row-major;
/// targets hold one class index per example. The loss is the mean negative
/// log-likelihood of the target class, with the softmax folded in for the
/// usual `probs - one_hot` gradient.
pub struct CrossEntropyLoss;

impl CrossEntropyLoss {
    /// Numerically stable softmax of one logit row
    pub(crate) fn softmax_row(row: &[f32]) -> Vec<f32> {
        let max = row.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        let exp: Vec<f32> = row.iter().map(|&v| (v - max).exp()).collect();
        let sum: f32 = exp.iter().sum();
        exp.into_iter().map(|v| v / sum).collect()
    }
}

impl LossFn for CrossEntropyLoss {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        let batch = targets.len();
        assert!(batch > 0, "targets must be non-empty");
        assert_eq!(
            predictions.len() % batch,
            0,
            "logit count must be a multiple of the batch size"
        );
        let classes = predictions.len() / batch;

        let logits = predictions.data();
        let logit_rows = logits.as_slice().expect("logits must be contiguous");
        let target_data = targets.data();

        let mut grad = Array1::zeros(predictions.len());
        let mut total = 0.0;
        for r in 0..batch {
            let row = &logit_rows[r * classes..(r + 1) * classes];
            let probs = Self::softmax_row(row);

            let target = target_data[r] as usize;
            assert!(target < classes, "target class {target} out of range for {classes} classes");

            total += -(probs[target].max(f32::MIN_POSITIVE)).ln();
            for c in 0..classes {
                let indicator = if c == target { 1.0 } else { 0.0 };
                grad[r * classes + c] = (probs[c] - indicator) / batch as f32;
            }
        }

        let mut loss = Tensor::from_vec(vec![total / batch as f32], predictions.requires_grad());

        if predictions.requires_grad() {
            loss.set_backward_op(Rc::new(CrossEntropyBackward {
                predictions: predictions.clone(),
                grad,
                result_grad: loss.grad_cell(),
            }));
        }

        loss
    }

    fn name(&self) -> &'static str {
        "cross_entropy"
    }
}

struct CrossEntropyBackward {
    predictions: Tensor,
    grad: Array1<f32>,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for CrossEntropyBackward {
    fn backward(&self) {
        if let Some(grad_output) = self.result_grad.borrow().as_ref() {
            self.predictions.accumulate_grad(&self.grad * grad_output[0]);

            if let Some(op) = self.predictions.backward_op() {
                op.backward();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd;
    use approx::assert_relative_eq;

    #[test]
    fn test_softmax_row_sums_to_one() {
        let probs = CrossEntropyLoss::softmax_row(&[1.0, 2.0, 3.0]);
        assert_relative_eq!(probs.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_softmax_row_stable_for_large_logits() {
        let probs = CrossEntropyLoss::softmax_row(&[1000.0, 1001.0, 1002.0]);
        assert_relative_eq!(probs.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        assert!(probs.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_uniform_logits_give_log_classes() {
        let loss_fn = CrossEntropyLoss;
        for &classes in &[2usize, 3, 5, 10] {
            let logits = Tensor::from_vec(vec![1.0; classes], false);
            let targets = Tensor::from_vec(vec![0.0], false);
            let loss = loss_fn.forward(&logits, &targets);
            assert_relative_eq!(loss.data()[0], (classes as f32).ln(), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_confident_correct_prediction_near_zero() {
        let loss_fn = CrossEntropyLoss;
        let logits = Tensor::from_vec(vec![50.0, -50.0, -50.0], false);
        let targets = Tensor::from_vec(vec![0.0], false);
        let loss = loss_fn.forward(&logits, &targets);
        assert!(loss.data()[0] < 1e-3);
    }

    #[test]
    fn test_batch_loss_is_mean_of_rows() {
        let loss_fn = CrossEntropyLoss;
        let row = vec![2.0, 1.0, 0.5];

        let single = loss_fn.forward(
            &Tensor::from_vec(row.clone(), false),
            &Tensor::from_vec(vec![0.0], false),
        );

        let mut doubled = row.clone();
        doubled.extend_from_slice(&row);
        let pair = loss_fn.forward(
            &Tensor::from_vec(doubled, false),
            &Tensor::from_vec(vec![0.0, 0.0], false),
        );

        assert_relative_eq!(single.data()[0], pair.data()[0], epsilon = 1e-6);
    }

    #[test]
    fn test_gradient_is_probs_minus_one_hot_over_batch() {
        let loss_fn = CrossEntropyLoss;
        let logits = Tensor::from_vec(vec![2.0, 1.0, 0.5], true);
        let targets = Tensor::from_vec(vec![0.0], false);

        let mut loss = loss_fn.forward(&logits, &targets);
        autograd::backward(&mut loss, None);

        let grad = logits.grad().unwrap();
        let probs = CrossEntropyLoss::softmax_row(&[2.0, 1.0, 0.5]);
        assert_relative_eq!(grad[0], probs[0] - 1.0, epsilon = 1e-5);
        assert_relative_eq!(grad[1], probs[1], epsilon = 1e-5);
        assert_relative_eq!(grad[2], probs[2], epsilon = 1e-5);
        // Target-class gradient pushes its logit up
        assert!(grad[0] < 0.0);
    }

    #[test]
    fn test_no_grad_when_predictions_detached() {
        let loss_fn = CrossEntropyLoss;
        let logits = Tensor::from_vec(vec![2.0, 1.0], false);
        let targets = Tensor::from_vec(vec![0.0], false);
        let loss = loss_fn.forward(&logits, &targets);
        assert!(loss.backward_op().is_none());
        assert!(loss.data()[0] > 0.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_target_out_of_range_rejected() {
        let loss_fn = CrossEntropyLoss;
        let logits = Tensor::from_vec(vec![1.0, 2.0], false);
        let targets = Tensor::from_vec(vec![5.0], false);
        let _ = loss_fn.forward(&logits, &targets);
    }

    #[test]
    fn test_loss_non_negative_for_extreme_logits() {
        let loss_fn = CrossEntropyLoss;
        let cases: Vec<Vec<f32>> = vec![
            vec![500.0, -500.0, 0.0],
            vec![-1000.0, -1000.0, -1000.0],
            vec![88.0, 88.0],
        ];
        for logits in cases {
            let n = logits.len();
            let loss = loss_fn.forward(
                &Tensor::from_vec(logits, false),
                &Tensor::from_vec(vec![(n - 1) as f32], false),
            );
            let val = loss.data()[0];
            assert!(val.is_finite() && val >= -1e-6, "loss {val} out of range");
        }
    }
}
