//! Tabular training data for decision-forest learners.
//!
//! A descriptor string declares each column as numerical (`N`), categorical
//! (`C`), label (`L`) or ignored (`I`). [`generate_dataset`] scans the rows
//! once and assigns every categorical and label value a code in
//! first-occurrence order; [`load_data`] then turns the same (or other) rows
//! into [`Instance`]s, skipping rows that hold the missing-value placeholder.
//!
//! ```
//! use forest_data::{generate_dataset, load_data};
//!
//! let rows = ["1.0,red,yes", "2.0,blue,no", "?,red,yes"];
//! let dataset = generate_dataset("N,C,L", &rows)?;
//! let data = load_data(&dataset, &rows)?;
//!
//! assert_eq!(data.len(), 2);
//! assert_eq!(data.get(1).unwrap().values(), &[2.0, 1.0]);
//! # Ok::<(), forest_data::LoadError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod synthetic;

pub use config::{LoaderConfig, Parallelism};
pub use data::{
    generate_dataset, generate_dataset_from_file, load_data, load_data_from_file, AttributeKind,
    Code, Condition, Data, Dataset, Descriptor, FileSystem, Instance, Loader, LocalFileSystem,
    MemoryFileSystem,
};
pub use error::{LoadError, Result};
