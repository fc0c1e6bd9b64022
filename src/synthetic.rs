//! Seeded random descriptors and rows.
//!
//! Numerical cells are uniform in `[-100, 100)`; categorical cells take one of
//! [`CATEGORICAL_RANGE`] integer values and labels one of [`LABEL_RANGE`].
//! Cells are written with `f64`'s `Display`, which round-trips exactly through
//! `str::parse::<f64>`.

use rand::prelude::*;

use crate::data::AttributeKind;

pub const CATEGORICAL_RANGE: u32 = 12;
pub const LABEL_RANGE: u32 = 4;

/// Random descriptor of `n_attributes` columns with exactly one label.
///
/// # Panics
///
/// If `n_attributes == 0`.
pub fn random_kinds<R: Rng>(rng: &mut R, n_attributes: usize) -> Vec<AttributeKind> {
    assert!(n_attributes > 0, "need at least the label column");
    let label = rng.gen_range(0..n_attributes);
    (0..n_attributes)
        .map(|i| {
            if i == label {
                return AttributeKind::Label;
            }
            match rng.gen_range(0..3) {
                0 => AttributeKind::Ignored,
                1 => AttributeKind::Numerical,
                _ => AttributeKind::Categorical,
            }
        })
        .collect()
}

/// Descriptor text for `kinds`, e.g. `"N,C,L"`.
pub fn descriptor_text(kinds: &[AttributeKind]) -> String {
    kinds
        .iter()
        .map(|k| k.token().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// One random value per column for each of `n_rows` rows.
pub fn random_values<R: Rng>(rng: &mut R, kinds: &[AttributeKind], n_rows: usize) -> Vec<Vec<f64>> {
    (0..n_rows)
        .map(|_| {
            kinds
                .iter()
                .map(|kind| match kind {
                    AttributeKind::Numerical | AttributeKind::Ignored => rng.gen_range(-100.0..100.0),
                    AttributeKind::Categorical => f64::from(rng.gen_range(0..CATEGORICAL_RANGE)),
                    AttributeKind::Label => f64::from(rng.gen_range(0..LABEL_RANGE)),
                })
                .collect()
        })
        .collect()
}

/// Rows as text plus the ground truth they were rendered from.
#[derive(Debug, Clone)]
pub struct SyntheticData {
    pub kinds: Vec<AttributeKind>,
    pub values: Vec<Vec<f64>>,
    pub rows: Vec<String>,
    /// Indices of rows carrying a missing-value placeholder, ascending.
    pub missing: Vec<usize>,
}

impl SyntheticData {
    /// `missing_rate` is the probability that a row gets one placeholder in a
    /// random non-ignored column.
    pub fn generate(seed: u64, n_attributes: usize, n_rows: usize, missing_rate: f64, placeholder: &str) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let kinds = random_kinds(&mut rng, n_attributes);
        let values = random_values(&mut rng, &kinds, n_rows);

        let candidates: Vec<usize> = kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| **k != AttributeKind::Ignored)
            .map(|(i, _)| i)
            .collect();

        let mut rows = Vec::with_capacity(n_rows);
        let mut missing = Vec::new();

        for (index, row) in values.iter().enumerate() {
            let hole = if rng.gen_bool(missing_rate) {
                missing.push(index);
                candidates.choose(&mut rng).copied()
            } else {
                None
            };

            // Trailing comma on every row, the way the rows are often exported.
            let mut line = String::new();
            for (column, value) in row.iter().enumerate() {
                if Some(column) == hole {
                    line.push_str(placeholder);
                } else {
                    line.push_str(&value.to_string());
                }
                line.push(',');
            }
            rows.push(line);
        }

        SyntheticData {
            kinds,
            values,
            rows,
            missing,
        }
    }

    pub fn descriptor(&self) -> String {
        descriptor_text(&self.kinds)
    }
}
