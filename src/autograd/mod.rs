//! Tape-based autograd engine
//!
//! Provides the tensor type, differentiable ops, and gradient propagation
//! the harness drives. The contract the rest of the crate relies on:
//! forward ops over shared-storage tensors, a backward pass triggered from
//! a scalar loss, and per-tensor gradient zeroing.

mod backward;
mod ops;
mod tensor;

pub use backward::BackwardOp;
pub use ops::*;
pub use tensor::Tensor;

/// Perform a backward pass starting at `tensor`.
///
/// When `grad_output` is `None` the gradient is seeded with ones, the usual
/// case for a scalar loss.
pub fn backward(tensor: &mut Tensor, grad_output: Option<ndarray::Array1<f32>>) {
    if let Some(grad) = grad_output {
        tensor.set_grad(grad);
    } else {
        let ones = ndarray::Array1::ones(tensor.len());
        tensor.set_grad(ones);
    }

    if let Some(op) = tensor.backward_op() {
        op.backward();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backward_seeds_ones_for_scalar() {
        let mut loss = Tensor::from_vec(vec![0.5], true);
        backward(&mut loss, None);
        assert_eq!(loss.grad().unwrap().to_vec(), vec![1.0]);
    }

    #[test]
    fn test_backward_through_chain() {
        // y = relu(x @ w), single row
        let x = Tensor::from_vec(vec![1.0, -2.0], false);
        let w = Tensor::from_vec(vec![0.5, -0.5, 1.0, 1.0], true);
        let h = matmul(&x, &w, 1, 2, 2);
        let mut y = relu(&h);
        backward(&mut y, None);

        let grad = w.grad().expect("weight gradient should exist");
        assert_eq!(grad.len(), 4);
        // h = [0.5 - 2.0, -0.5 - 2.0] = [-1.5, -2.5]; both relu-masked,
        // so every weight gradient is zero.
        assert!(grad.iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_backward_positive_path_propagates() {
        let x = Tensor::from_vec(vec![1.0, 2.0], false);
        let w = Tensor::from_vec(vec![1.0, 0.0, 0.0, 1.0], true);
        let h = matmul(&x, &w, 1, 2, 2);
        let mut y = relu(&h);
        backward(&mut y, None);

        // h = [1.0, 2.0], both positive: grad_w = x^T @ ones
        assert_eq!(w.grad().unwrap().to_vec(), vec![1.0, 1.0, 2.0, 2.0]);
    }
}
