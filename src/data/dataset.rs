use std::path::Path;

use serde::{Deserialize, Serialize};

use super::descriptor::{AttributeKind, Descriptor};
use super::vocabulary::{Code, Vocabulary};
use crate::error::{LoadError, Result};

// ---------------------------------------------------------------------------
// Dataset – attribute metadata plus per-column value tables
// ---------------------------------------------------------------------------

/// Attribute metadata derived from one (descriptor, rows) pair.
///
/// Two index spaces are in play:
/// * **column** – physical position in a row, ignored and label columns
///   included;
/// * **feature** – position in [`Instance::values`](super::Instance), i.e.
///   the n-th numerical or categorical column.
///
/// The predicates `is_numerical`/`is_categorical`/`value_of` take feature
/// indices. The label lives outside the feature space, so `is_label` and
/// `kind` take column indices.
///
/// Equality compares the attribute kinds and every value table, code order
/// included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DatasetRepr", into = "DatasetRepr")]
pub struct Dataset {
    descriptor: Descriptor,
    /// One slot per column; `Some` exactly for categorical and label columns.
    vocabularies: Vec<Option<Vocabulary>>,
    /// feature index → column index
    features: Vec<usize>,
}

impl Dataset {
    pub(crate) fn from_parts(descriptor: Descriptor, vocabularies: Vec<Option<Vocabulary>>) -> Result<Self> {
        if vocabularies.len() != descriptor.len() {
            return Err(LoadError::malformed(format!(
                "{} value tables for {} attributes",
                vocabularies.len(),
                descriptor.len()
            )));
        }
        for (column, (kind, vocab)) in descriptor.kinds().iter().zip(&vocabularies).enumerate() {
            if kind.is_coded() != vocab.is_some() {
                return Err(LoadError::malformed(format!(
                    "column {column} ({kind:?}) has inconsistent value table"
                )));
            }
        }

        let features = descriptor
            .kinds()
            .iter()
            .enumerate()
            .filter(|(_, k)| k.is_feature())
            .map(|(i, _)| i)
            .collect();

        Ok(Dataset {
            descriptor,
            vocabularies,
            features,
        })
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Physical columns, ignored and label included.
    pub fn n_columns(&self) -> usize {
        self.descriptor.len()
    }

    /// Length of every instance's feature vector.
    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    /// # Panics
    ///
    /// If `column >= n_columns()`.
    pub fn kind(&self, column: usize) -> AttributeKind {
        self.descriptor.kinds()[column]
    }

    pub fn label_column(&self) -> usize {
        self.descriptor.label_column()
    }

    pub fn is_label(&self, column: usize) -> bool {
        column == self.descriptor.label_column()
    }

    /// Column that feeds feature `feature`.
    ///
    /// # Panics
    ///
    /// If `feature >= n_features()`.
    pub fn feature_column(&self, feature: usize) -> usize {
        self.features[feature]
    }

    /// # Panics
    ///
    /// If `feature >= n_features()`.
    pub fn is_numerical(&self, feature: usize) -> bool {
        self.kind(self.features[feature]) == AttributeKind::Numerical
    }

    /// # Panics
    ///
    /// If `feature >= n_features()`.
    pub fn is_categorical(&self, feature: usize) -> bool {
        self.kind(self.features[feature]) == AttributeKind::Categorical
    }

    /// Code of `value` in categorical feature `feature`.
    pub fn value_of(&self, feature: usize, value: &str) -> Result<Code> {
        self.feature_vocabulary(feature)?
            .code(value)
            .ok_or_else(|| LoadError::UnknownCategoricalValue {
                feature,
                value: value.to_string(),
            })
    }

    /// Code of the label text `value`.
    pub fn label_code(&self, value: &str) -> Result<Code> {
        self.label_vocabulary()
            .code(value)
            .ok_or_else(|| LoadError::UnknownLabelValue {
                value: value.to_string(),
            })
    }

    /// Text behind a label code.
    pub fn label_name(&self, code: Code) -> Option<&str> {
        self.label_vocabulary().value(code)
    }

    /// Text behind a categorical code.
    pub fn value_name(&self, feature: usize, code: Code) -> Option<&str> {
        self.feature_vocabulary(feature).ok()?.value(code)
    }

    /// Distinct values seen for a categorical feature; 0 for numerical ones.
    pub fn n_values(&self, feature: usize) -> usize {
        self.feature_vocabulary(feature).map_or(0, Vocabulary::len)
    }

    pub fn n_labels(&self) -> usize {
        self.label_vocabulary().len()
    }

    /// Label texts ordered by code.
    pub fn labels(&self) -> &[String] {
        self.label_vocabulary().values()
    }

    /// Value table of a raw column, `None` for numerical and ignored columns.
    pub fn vocabulary(&self, column: usize) -> Option<&Vocabulary> {
        self.vocabularies.get(column).and_then(Option::as_ref)
    }

    fn feature_vocabulary(&self, feature: usize) -> Result<&Vocabulary> {
        self.features
            .get(feature)
            .and_then(|&column| self.vocabulary(column))
            .ok_or(LoadError::NotCategorical { feature })
    }

    fn label_vocabulary(&self) -> &Vocabulary {
        // from_parts guarantees the label column carries a table
        match &self.vocabularies[self.descriptor.label_column()] {
            Some(vocab) => vocab,
            None => unreachable!("label column without value table"),
        }
    }

    // -- persistence --

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

// ---------------------------------------------------------------------------
// On-disk form
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct DatasetRepr {
    attributes: Vec<AttributeKind>,
    values: Vec<Option<Vocabulary>>,
}

impl TryFrom<DatasetRepr> for Dataset {
    type Error = LoadError;

    fn try_from(repr: DatasetRepr) -> Result<Self> {
        let descriptor = Descriptor::from_kinds(repr.attributes)?;
        Dataset::from_parts(descriptor, repr.values)
    }
}

impl From<Dataset> for DatasetRepr {
    fn from(ds: Dataset) -> Self {
        DatasetRepr {
            attributes: ds.descriptor.kinds().to_vec(),
            values: ds.vocabularies,
        }
    }
}
