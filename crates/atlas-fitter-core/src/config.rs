use serde::{Deserialize, Serialize};

/// Sizing constraints and search budget for one fitting run.
/// Key notes:
///   - `max_width`/`max_height` cap bin growth but are raised per-area when a
///     single area is larger than the cap
///   - `max_bin_size` prunes by area in the inner loop; setting it tighter
///     than the width/height caps is markedly more expensive to search under
///   - `fit_calls_limit` bounds the total number of placement trials across
///     all workers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitterConfig {
    /// Maximum bin width in pixels.
    pub max_width: u32,
    /// Maximum bin height in pixels.
    pub max_height: u32,
    /// Hard cap on a single bin's area (width * height).
    #[serde(default = "default_max_bin_size")]
    pub max_bin_size: u64,
    /// Number of bins to start with. Raise after a budget-exhausted run.
    #[serde(default = "default_min_bin_count")]
    pub min_bin_count: usize,
    /// Total placement-trial budget shared by all workers.
    #[serde(default = "default_fit_calls_limit")]
    pub fit_calls_limit: u64,
    /// Explore with one worker per root area when the "parallel" feature is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for FitterConfig {
    fn default() -> Self {
        Self {
            max_width: 1024,
            max_height: 1024,
            max_bin_size: default_max_bin_size(),
            min_bin_count: default_min_bin_count(),
            fit_calls_limit: default_fit_calls_limit(),
            parallel: false,
        }
    }
}

impl FitterConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::FitError;

        if self.min_bin_count == 0 {
            return Err(FitError::InvalidConfig(
                "min_bin_count must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Create a fluent builder for `FitterConfig`.
    pub fn builder() -> FitterConfigBuilder {
        FitterConfigBuilder::new()
    }
}

fn default_max_bin_size() -> u64 {
    u64::MAX
}
fn default_min_bin_count() -> usize {
    1
}
fn default_fit_calls_limit() -> u64 {
    100_000
}

/// Builder for `FitterConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct FitterConfigBuilder {
    cfg: FitterConfig,
}

impl FitterConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: FitterConfig::default(),
        }
    }
    pub fn with_max_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.max_width = w;
        self.cfg.max_height = h;
        self
    }
    pub fn max_bin_size(mut self, v: u64) -> Self {
        self.cfg.max_bin_size = v;
        self
    }
    pub fn min_bin_count(mut self, v: usize) -> Self {
        self.cfg.min_bin_count = v;
        self
    }
    pub fn fit_calls_limit(mut self, v: u64) -> Self {
        self.cfg.fit_calls_limit = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> FitterConfig {
        self.cfg
    }
}
