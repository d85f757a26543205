//! Training configuration

/// Construction-time configuration for a [`super::Model`].
///
/// Everything the loop needs beyond its collaborators lives here
/// explicitly: batch size, the shuffle seed, optional gradient clipping,
/// and whether the per-epoch report line is emitted.
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Mini-batch size; the last batch of an epoch may be smaller
    pub batch_size: usize,
    /// Seed for the per-epoch shuffle stream
    pub seed: u64,
    /// Clip gradients to this global norm before each optimizer step
    pub max_grad_norm: Option<f32>,
    /// Emit one progress line per epoch
    pub verbose: bool,
}

impl FitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch size must be positive");
        self.batch_size = batch_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_grad_norm(mut self, max_norm: f32) -> Self {
        self.max_grad_norm = Some(max_norm);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            seed: 123,
            max_grad_norm: None,
            verbose: true,
        }
    }
}
