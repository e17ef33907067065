//! Configuration for a runtime session.

/// Limits and selection settings for a [`Runtime`](crate::Runtime).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Seed for scenario builder selection. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Maximum nesting of DSL function calls.
    pub max_call_depth: usize,

    /// Maximum iterations of a single `while` loop.
    pub max_loop_iterations: usize,

    /// Keep `print` output for the caller (it is always logged).
    pub capture_output: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_call_depth: 64,
            max_loop_iterations: 100_000,
            capture_output: true,
        }
    }
}

impl RuntimeConfig {
    /// A configuration with a fixed seed, for reproducible content generation.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Builder method to set the selection seed.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method to set the call depth limit.
    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Builder method to set the loop iteration limit.
    #[must_use]
    pub fn with_max_loop_iterations(mut self, iterations: usize) -> Self {
        self.max_loop_iterations = iterations;
        self
    }

    /// Builder method to enable/disable output capture.
    #[must_use]
    pub fn with_capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }
}
