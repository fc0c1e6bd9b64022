//! Data layer: descriptor parsing, value tables, loading.
//!
//! Architecture:
//! ```text
//!   descriptor "N,C,L"          raw rows "1.0,red,yes"
//!        │                            │
//!        ▼                            │
//!   ┌────────────┐                    │
//!   │ descriptor │  tokens → AttributeKind per column
//!   └────────────┘                    │
//!        │                            │
//!        ▼                            ▼
//!   ┌──────────────────────────────────────┐
//!   │ loader (vocabulary pass)             │  first-occurrence codes
//!   └──────────────────────────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset  │  kinds + Vocabulary per coded column
//!   └──────────┘
//!        │                            raw rows again
//!        ▼                            │
//!   ┌──────────────────────────────────────┐
//!   │ loader (decode pass)                 │  Instance or skip
//!   └──────────────────────────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Data    │  Vec<Instance>, borrows the Dataset
//!   └──────────┘
//! ```

pub mod condition;
pub mod dataset;
pub mod descriptor;
pub mod instance;
pub mod loader;
pub mod source;
pub mod vocabulary;

pub use condition::Condition;
pub use dataset::Dataset;
pub use descriptor::{AttributeKind, Descriptor};
pub use instance::{Data, Instance};
pub use loader::{
    generate_dataset, generate_dataset_from_file, load_data, load_data_from_file, Loader,
};
pub use source::{read_lines, FileSystem, LocalFileSystem, MemoryFileSystem};
pub use vocabulary::{Code, Vocabulary};
