use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, Result};

// ---------------------------------------------------------------------------
// AttributeKind – the declared role of one physical column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    Ignored,
    Numerical,
    Categorical,
    Label,
}

impl AttributeKind {
    /// Parse a single marker (`N`, `C`, `L`, `I`, any case).
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "N" => Some(AttributeKind::Numerical),
            "C" => Some(AttributeKind::Categorical),
            "L" => Some(AttributeKind::Label),
            "I" => Some(AttributeKind::Ignored),
            _ => None,
        }
    }

    pub fn token(self) -> char {
        match self {
            AttributeKind::Numerical => 'N',
            AttributeKind::Categorical => 'C',
            AttributeKind::Label => 'L',
            AttributeKind::Ignored => 'I',
        }
    }

    /// Numerical and categorical columns end up in the feature vector.
    pub fn is_feature(self) -> bool {
        matches!(self, AttributeKind::Numerical | AttributeKind::Categorical)
    }

    /// Categorical and label columns get a vocabulary.
    pub fn is_coded(self) -> bool {
        matches!(self, AttributeKind::Categorical | AttributeKind::Label)
    }
}

// ---------------------------------------------------------------------------
// Descriptor – ordered attribute declarations
// ---------------------------------------------------------------------------

/// Parsed form of a descriptor string such as `"I, N, 3 C, L"`.
///
/// Tokens are separated by commas and/or whitespace. A marker may carry a
/// repetition count, either as its own token (`3 C`) or glued to it (`3C`).
/// Exactly one `L` must be present. The column count is not known here; rows
/// are checked against [`Descriptor::len`] when they are scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    kinds: Vec<AttributeKind>,
    label: usize,
}

impl Descriptor {
    pub fn parse(text: &str) -> Result<Self> {
        let mut kinds = Vec::new();
        let mut pending: Option<usize> = None;

        let tokens = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty());

        for token in tokens {
            let split = token
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(token.len());
            let (digits, marker) = token.split_at(split);

            if !digits.is_empty() {
                if pending.is_some() {
                    return Err(LoadError::malformed(format!(
                        "repetition count '{digits}' follows another count"
                    )));
                }
                let count: usize = digits.parse().map_err(|_| {
                    LoadError::malformed(format!("repetition count '{digits}' is too large"))
                })?;
                if count == 0 {
                    return Err(LoadError::malformed("repetition count must be positive"));
                }
                pending = Some(count);
            }

            if marker.is_empty() {
                continue;
            }

            let kind = AttributeKind::from_token(marker)
                .ok_or_else(|| LoadError::malformed(format!("unknown token '{marker}'")))?;
            let count = pending.take().unwrap_or(1);
            kinds.extend(std::iter::repeat(kind).take(count));
        }

        if let Some(count) = pending {
            return Err(LoadError::malformed(format!(
                "repetition count {count} is not followed by a marker"
            )));
        }

        Self::from_kinds(kinds)
    }

    /// Build a descriptor from already-typed kinds. Same label rule as
    /// [`Descriptor::parse`].
    pub fn from_kinds(kinds: Vec<AttributeKind>) -> Result<Self> {
        if kinds.is_empty() {
            return Err(LoadError::malformed("descriptor declares no attributes"));
        }

        let mut labels = kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == AttributeKind::Label)
            .map(|(i, _)| i);

        let label = match (labels.next(), labels.next()) {
            (Some(i), None) => i,
            (None, _) => return Err(LoadError::malformed("no label attribute declared")),
            (Some(_), Some(_)) => {
                return Err(LoadError::malformed("more than one label attribute declared"))
            }
        };

        Ok(Descriptor { kinds, label })
    }

    /// Attribute kinds in physical column order.
    pub fn kinds(&self) -> &[AttributeKind] {
        &self.kinds
    }

    /// Number of physical columns, ignored ones included.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn label_column(&self) -> usize {
        self.label
    }

    pub fn n_features(&self) -> usize {
        self.kinds.iter().filter(|k| k.is_feature()).count()
    }

    pub(crate) fn check_row_len(&self, row: usize, found: usize) -> Result<()> {
        if found != self.kinds.len() {
            return Err(LoadError::ColumnCountMismatch {
                row,
                expected: self.kinds.len(),
                found,
            });
        }
        Ok(())
    }
}

impl FromStr for Descriptor {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self> {
        Descriptor::parse(s)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.kinds.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", kind.token())?;
        }
        Ok(())
    }
}
