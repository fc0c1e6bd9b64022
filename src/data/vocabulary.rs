use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Integer assigned to a distinct observed text value.
pub type Code = u32;

// ---------------------------------------------------------------------------
// Vocabulary – text → code intern table
// ---------------------------------------------------------------------------

/// Value table of one categorical or label column.
///
/// Codes are handed out in first-occurrence order starting at 0, so the codes
/// of a table with `k` entries are exactly `0..k`. The reverse direction is the
/// `values` vector itself; the hash index is rebuilt from it on deserialize,
/// where a repeated value is rejected since it would shift every later code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    values: Vec<String>,
    index: HashMap<String, Code>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Code of `value`, assigning the next unused one if it is new.
    pub fn intern(&mut self, value: &str) -> Code {
        if let Some(&code) = self.index.get(value) {
            return code;
        }
        let code = self.values.len() as Code;
        self.values.push(value.to_string());
        self.index.insert(value.to_string(), code);
        code
    }

    pub fn code(&self, value: &str) -> Option<Code> {
        self.index.get(value).copied()
    }

    pub fn value(&self, code: Code) -> Option<&str> {
        self.values.get(code as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values ordered by code.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

// The index is derived from `values`, so equality only looks at the ordered
// value list.
impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for Vocabulary {}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = LoadError;

    fn try_from(values: Vec<String>) -> Result<Self, LoadError> {
        let mut vocab = Vocabulary::new();
        for (expected, v) in values.iter().enumerate() {
            if vocab.intern(v) as usize != expected {
                return Err(LoadError::malformed(format!(
                    "value '{v}' listed twice in value table"
                )));
            }
        }
        Ok(vocab)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.values
    }
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut vocab = Vocabulary::new();
        for v in iter {
            vocab.intern(v.as_ref());
        }
        vocab
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_first_occurrence() {
        let mut v = Vocabulary::new();
        assert_eq!(v.intern("red"), 0);
        assert_eq!(v.intern("blue"), 1);
        assert_eq!(v.intern("red"), 0);
        assert_eq!(v.intern("green"), 2);

        assert_eq!(v.len(), 3);
        assert_eq!(v.code("blue"), Some(1));
        assert_eq!(v.code("purple"), None);
        assert_eq!(v.value(2), Some("green"));
        assert_eq!(v.value(3), None);
    }

    #[test]
    fn equality_depends_on_order() {
        let a: Vocabulary = ["x", "y"].into_iter().collect();
        let b: Vocabulary = ["x", "y", "x"].into_iter().collect();
        let c: Vocabulary = ["y", "x"].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn serializes_as_plain_list() {
        let v: Vocabulary = ["no", "yes"].into_iter().collect();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"["no","yes"]"#);

        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code("yes"), Some(1));
    }

    #[test]
    fn repeated_values_do_not_deserialize() {
        let err = Vocabulary::try_from(vec!["a".to_string(), "a".to_string(), "b".to_string()]).unwrap_err();
        assert!(err.is_malformed_descriptor());
        assert!(serde_json::from_str::<Vocabulary>(r#"["a","a","b"]"#).is_err());
    }
}
