use serde::Deserialize;
use crate::error::{Error, Result};
use crate::heuristics::Heuristic;

const DEFAULT_SEARCH_DEPTH: u32 = 3;
const DEFAULT_TIMEOUT_MS: f64 = 10.0;

fn default_search_depth() -> u32 {
    DEFAULT_SEARCH_DEPTH
}

fn default_timeout_ms() -> f64 {
    DEFAULT_TIMEOUT_MS
}

/// Settings shared by both engines. Fixed for the lifetime of an engine.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SearchConfig<E = Heuristic> {
    /// Plies searched by the fixed-depth engine.
    #[serde(default = "default_search_depth")]
    pub search_depth: u32,
    #[serde(default)]
    pub evaluator: E,
    /// Search aborts once fewer than this many milliseconds remain.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: f64,
    /// Deepest iteration the iterative-deepening engine will start.
    #[serde(default)]
    pub max_depth: Option<u32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
            evaluator: Heuristic::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_depth: None,
        }
    }
}

impl<E> SearchConfig<E> {
    pub fn new(search_depth: u32, evaluator: E, timeout_ms: f64) -> Result<Self> {
        let config = Self { search_depth, evaluator, timeout_ms, max_depth: None };
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_depth(self, max_depth: Option<u32>) -> Self {
        Self { max_depth, ..self }
    }

    /// Swaps the evaluator, keeping every other setting.
    pub fn with_evaluator<F>(self, evaluator: F) -> SearchConfig<F> {
        SearchConfig {
            search_depth: self.search_depth,
            evaluator,
            timeout_ms: self.timeout_ms,
            max_depth: self.max_depth,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.search_depth == 0 {
            return Err(Error::InvalidConfiguration {
                message: "search depth must be positive".to_string(),
            });
        }
        if !self.timeout_ms.is_finite() || self.timeout_ms < 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!("timeout threshold must be a non-negative number of ms, got {}", self.timeout_ms),
            });
        }
        if self.max_depth == Some(0) {
            return Err(Error::InvalidConfiguration {
                message: "max depth must be positive when set".to_string(),
            });
        }
        Ok(())
    }
}
