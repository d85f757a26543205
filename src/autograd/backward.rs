//! Backward-op trait for the gradient tape

/// A node in the backward graph.
///
/// Each differentiable op records one of these on its output tensor. Calling
/// `backward` propagates the output's gradient into the op's inputs and
/// recurses into their backward ops.
pub trait BackwardOp {
    /// Propagate gradients from the output to the inputs
    fn backward(&self);
}
