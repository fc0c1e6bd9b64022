use std::path::Path;

use log::{debug, info};
use rayon::prelude::*;

use super::dataset::Dataset;
use super::descriptor::{AttributeKind, Descriptor};
use super::instance::{Data, Instance};
use super::source::{read_lines, FileSystem};
use super::vocabulary::{Code, Vocabulary};
use crate::config::LoaderConfig;
use crate::error::{LoadError, Result};

/// Rows per shard in the parallel vocabulary scan.
const SCAN_CHUNK_ROWS: usize = 1024;

// ---------------------------------------------------------------------------
// Public entry-points (default config)
// ---------------------------------------------------------------------------

/// Parse `descriptor` and build the value tables from `rows`.
pub fn generate_dataset<S: AsRef<str> + Sync>(descriptor: &str, rows: &[S]) -> Result<Dataset> {
    Loader::default().generate_dataset(descriptor, rows)
}

/// Same as [`generate_dataset`] with the rows read from `path`.
pub fn generate_dataset_from_file<F: FileSystem>(descriptor: &str, fs: &F, path: &Path) -> Result<Dataset> {
    Loader::default().generate_dataset_from_file(descriptor, fs, path)
}

/// Decode `rows` against `dataset`, dropping rows with missing values.
pub fn load_data<'d, S: AsRef<str> + Sync>(dataset: &'d Dataset, rows: &[S]) -> Result<Data<'d>> {
    Loader::default().load_data(dataset, rows)
}

/// Same as [`load_data`] with the rows read from `path`.
pub fn load_data_from_file<'d, F: FileSystem>(dataset: &'d Dataset, fs: &F, path: &Path) -> Result<Data<'d>> {
    Loader::default().load_data_from_file(dataset, fs, path)
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Build-then-decode pipeline with an explicit [`LoaderConfig`].
#[derive(Debug, Clone, Default)]
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    pub fn new(config: LoaderConfig) -> Self {
        Loader { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn generate_dataset<S: AsRef<str> + Sync>(&self, descriptor: &str, rows: &[S]) -> Result<Dataset> {
        let descriptor = Descriptor::parse(descriptor)?;
        self.build_dataset(descriptor, rows)
    }

    pub fn generate_dataset_from_file<F: FileSystem>(
        &self,
        descriptor: &str,
        fs: &F,
        path: &Path,
    ) -> Result<Dataset> {
        let descriptor = Descriptor::parse(descriptor)?;
        let rows = read_lines(fs, path)?;
        self.build_dataset(descriptor, &rows)
    }

    /// Vocabulary pass over an already parsed descriptor.
    pub fn build_dataset<S: AsRef<str> + Sync>(&self, descriptor: Descriptor, rows: &[S]) -> Result<Dataset> {
        let missing = self.config.missing_value.as_str();
        let vocabularies = if self.config.parallelism.is_parallel() {
            scan_parallel(&descriptor, rows, missing)?
        } else {
            scan_rows(&descriptor, rows, 0, missing)?
        };

        let dataset = Dataset::from_parts(descriptor, vocabularies)?;
        info!(
            "generated dataset: {} columns, {} features, {} labels from {} rows",
            dataset.n_columns(),
            dataset.n_features(),
            dataset.n_labels(),
            rows.len()
        );
        Ok(dataset)
    }

    pub fn load_data<'d, S: AsRef<str> + Sync>(&self, dataset: &'d Dataset, rows: &[S]) -> Result<Data<'d>> {
        let missing = self.config.missing_value.as_str();

        let decoded: Vec<Result<Option<Decoded>>> = if self.config.parallelism.is_parallel() {
            rows.par_iter()
                .enumerate()
                .map(|(row, line)| decode_row(dataset, row, line.as_ref(), missing))
                .collect()
        } else {
            rows.iter()
                .enumerate()
                .map(|(row, line)| decode_row(dataset, row, line.as_ref(), missing))
                .collect()
        };

        debug!("decoded {} rows ({:?})", decoded.len(), self.config.parallelism);

        // Ids are handed out here, in row order, so skipped rows consume none
        // regardless of how the rows were decoded.
        let mut instances = Vec::with_capacity(decoded.len());
        for result in decoded {
            if let Some(Decoded { values, label }) = result? {
                instances.push(Instance::new(instances.len(), values, label));
            }
        }

        info!(
            "loaded {} instances from {} rows ({} skipped)",
            instances.len(),
            rows.len(),
            rows.len() - instances.len()
        );
        Ok(Data::new(dataset, instances))
    }

    pub fn load_data_from_file<'d, F: FileSystem>(
        &self,
        dataset: &'d Dataset,
        fs: &F,
        path: &Path,
    ) -> Result<Data<'d>> {
        let rows = read_lines(fs, path)?;
        self.load_data(dataset, &rows)
    }

    /// Decode a single row against an existing dataset.
    ///
    /// Returns `Ok(None)` when the row is blank or carries a missing value.
    /// Unlike the build-then-load pipeline, `line` may hold values the
    /// dataset has never seen, which surface as
    /// [`LoadError::UnknownCategoricalValue`] / [`LoadError::UnknownLabelValue`].
    pub fn convert(&self, dataset: &Dataset, id: usize, line: &str) -> Result<Option<Instance>> {
        let decoded = decode_row(dataset, id, line, &self.config.missing_value)?;
        Ok(decoded.map(|Decoded { values, label }| Instance::new(id, values, label)))
    }
}

// ---------------------------------------------------------------------------
// Row text
// ---------------------------------------------------------------------------

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Split a row into trimmed fields. One trailing comma is tolerated.
fn split_fields(line: &str) -> Vec<&str> {
    let line = line.trim();
    let line = line.strip_suffix(',').unwrap_or(line);
    line.split(',').map(str::trim).collect()
}

// ---------------------------------------------------------------------------
// Vocabulary pass
// ---------------------------------------------------------------------------

/// Sequential scan; `first_row` offsets row numbers in errors.
fn scan_rows<S: AsRef<str>>(
    descriptor: &Descriptor,
    rows: &[S],
    first_row: usize,
    missing: &str,
) -> Result<Vec<Option<Vocabulary>>> {
    let mut vocabularies: Vec<Option<Vocabulary>> = descriptor
        .kinds()
        .iter()
        .map(|k| k.is_coded().then(Vocabulary::new))
        .collect();

    for (offset, line) in rows.iter().enumerate() {
        let line = line.as_ref();
        if is_blank(line) {
            continue;
        }
        let fields = split_fields(line);
        descriptor.check_row_len(first_row + offset, fields.len())?;

        // Rows with missing fields still contribute their other values.
        for (field, vocab) in fields.into_iter().zip(vocabularies.iter_mut()) {
            if let Some(vocab) = vocab {
                if field != missing {
                    vocab.intern(field);
                }
            }
        }
    }

    debug!("scanned {} rows starting at row {}", rows.len(), first_row);
    Ok(vocabularies)
}

/// Sharded scan giving the same codes as [`scan_rows`].
///
/// Every shard interns its own rows, so each shard table lists values in
/// shard-local first-occurrence order. Re-interning the shard tables in shard
/// order therefore assigns codes in global first-occurrence order.
fn scan_parallel<S: AsRef<str> + Sync>(
    descriptor: &Descriptor,
    rows: &[S],
    missing: &str,
) -> Result<Vec<Option<Vocabulary>>> {
    let shards: Vec<Result<Vec<Option<Vocabulary>>>> = rows
        .par_chunks(SCAN_CHUNK_ROWS)
        .enumerate()
        .map(|(chunk, lines)| scan_rows(descriptor, lines, chunk * SCAN_CHUNK_ROWS, missing))
        .collect();

    let mut merged: Vec<Option<Vocabulary>> = descriptor
        .kinds()
        .iter()
        .map(|k| k.is_coded().then(Vocabulary::new))
        .collect();

    for shard in shards {
        for (target, local) in merged.iter_mut().zip(shard?) {
            if let (Some(target), Some(local)) = (target, local) {
                for value in local.values() {
                    target.intern(value);
                }
            }
        }
    }

    Ok(merged)
}

// ---------------------------------------------------------------------------
// Decode pass
// ---------------------------------------------------------------------------

struct Decoded {
    values: Vec<f64>,
    label: Code,
}

/// Decode one row. `Ok(None)` is the skip signal for blank rows and rows
/// holding the missing-value placeholder in a non-ignored column.
fn decode_row(dataset: &Dataset, row: usize, line: &str, missing: &str) -> Result<Option<Decoded>> {
    if is_blank(line) {
        return Ok(None);
    }
    let fields = split_fields(line);
    let descriptor = dataset.descriptor();
    descriptor.check_row_len(row, fields.len())?;

    // A placeholder anywhere skips the row before any field is parsed, so a
    // malformed number next to a missing value is never reported.
    let has_missing = descriptor
        .kinds()
        .iter()
        .zip(&fields)
        .any(|(kind, field)| *kind != AttributeKind::Ignored && *field == missing);
    if has_missing {
        return Ok(None);
    }

    let mut values = Vec::with_capacity(dataset.n_features());
    let mut label = None;

    for (column, (kind, field)) in descriptor.kinds().iter().zip(fields).enumerate() {
        match kind {
            AttributeKind::Ignored => {}
            AttributeKind::Numerical => {
                let value = field
                    .parse::<f64>()
                    .map_err(|_| LoadError::InvalidNumericLiteral {
                        row,
                        column,
                        text: field.to_string(),
                    })?;
                values.push(value);
            }
            AttributeKind::Categorical => {
                // values.len() is the index of the feature being filled
                let code = dataset.value_of(values.len(), field)?;
                values.push(f64::from(code));
            }
            AttributeKind::Label => {
                label = Some(dataset.label_code(field)?);
            }
        }
    }

    let label = label.ok_or_else(|| LoadError::malformed("descriptor has no label column"))?;
    Ok(Some(Decoded { values, label }))
}
