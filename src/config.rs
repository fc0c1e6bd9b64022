use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default placeholder marking an absent field value.
pub const DEFAULT_MISSING_VALUE: &str = "?";

// ---------------------------------------------------------------------------
// Parallelism
// ---------------------------------------------------------------------------

/// Whether the loader may use rayon parallel iterators.
///
/// Both settings produce identical datasets and instance sequences; the flag
/// only chooses how the rows are scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parallelism {
    #[default]
    Sequential,
    Parallel,
}

impl Parallelism {
    /// - 0 = parallel if the rayon pool has more than one thread
    /// - 1 = sequential
    /// - >1 = parallel
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }
}

// ---------------------------------------------------------------------------
// LoaderConfig
// ---------------------------------------------------------------------------

/// Settings shared by the vocabulary pass and the decode pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Token marking a missing field.
    pub missing_value: String,
    pub parallelism: Parallelism,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            missing_value: DEFAULT_MISSING_VALUE.to_string(),
            parallelism: Parallelism::Sequential,
        }
    }
}

impl LoaderConfig {
    pub fn with_missing_value(mut self, token: impl Into<String>) -> Self {
        self.missing_value = token.into();
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Read a config written as JSON. Absent keys fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
