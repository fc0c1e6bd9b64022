use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;

// ---------------------------------------------------------------------------
// FileSystem – where raw lines come from
// ---------------------------------------------------------------------------

/// Minimal storage collaborator: open a path for line-by-line reading.
///
/// The handle is dropped (closed) once the lines are read, on success and on
/// error alike.
pub trait FileSystem {
    type Reader: BufRead;

    fn open(&self, path: &Path) -> io::Result<Self::Reader>;
}

/// The local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    type Reader = BufReader<File>;

    fn open(&self, path: &Path) -> io::Result<Self::Reader> {
        Ok(BufReader::new(File::open(path)?))
    }
}

/// Files held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl FileSystem for MemoryFileSystem {
    type Reader = Cursor<Vec<u8>>;

    fn open(&self, path: &Path) -> io::Result<Self::Reader> {
        self.files
            .get(path)
            .map(|text| Cursor::new(text.clone().into_bytes()))
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such file: {}", path.display()),
                )
            })
    }
}

// ---------------------------------------------------------------------------
// Line materialisation
// ---------------------------------------------------------------------------

/// Read every line of `path` into memory, in file order.
pub fn read_lines<F: FileSystem>(fs: &F, path: &Path) -> Result<Vec<String>> {
    let reader = fs.open(path)?;
    let lines = reader.lines().collect::<io::Result<Vec<_>>>()?;
    debug!("read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn local_and_memory_sources_agree() {
        let text = "1,a,x,\n2,b,y,\n";

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        let local = read_lines(&LocalFileSystem, file.path()).unwrap();

        let mut mem = MemoryFileSystem::new();
        mem.insert("/data/train.csv", text);
        let memory = read_lines(&mem, Path::new("/data/train.csv")).unwrap();

        assert_eq!(local, vec!["1,a,x,", "2,b,y,"]);
        assert_eq!(local, memory);
    }

    #[test]
    fn missing_file_is_io_error() {
        let mem = MemoryFileSystem::new();
        let err = read_lines(&mem, Path::new("nope")).unwrap_err();
        assert!(matches!(err, crate::error::LoadError::Io(_)));
    }
}
