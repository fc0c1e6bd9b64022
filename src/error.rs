use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Everything that can abort a dataset build, a load, or a single-row decode.
///
/// A row carrying the missing-value placeholder is *not* an error: the decoder
/// reports it as a skip and the loaders drop it silently.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Bad token, wrong number of label markers, empty descriptor.
    #[error("malformed descriptor: {reason}")]
    MalformedDescriptor { reason: String },

    /// A row whose field count disagrees with the descriptor.
    #[error("malformed descriptor: row {row} has {found} fields but the descriptor declares {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column {column}: '{text}' is not a number")]
    InvalidNumericLiteral {
        row: usize,
        column: usize,
        text: String,
    },

    #[error("feature {feature}: unknown categorical value '{value}'")]
    UnknownCategoricalValue { feature: usize, value: String },

    #[error("unknown label value '{value}'")]
    UnknownLabelValue { value: String },

    /// A categorical lookup addressed to a numerical (or out-of-range) feature.
    #[error("feature {feature} is not categorical")]
    NotCategorical { feature: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl LoadError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        LoadError::MalformedDescriptor {
            reason: reason.into(),
        }
    }

    /// `true` for both descriptor-level and row-level shape failures.
    pub fn is_malformed_descriptor(&self) -> bool {
        matches!(
            self,
            LoadError::MalformedDescriptor { .. } | LoadError::ColumnCountMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
