//! Byte stream acquisition.
//!
//! Decoders never open files themselves; a [`Source`] turns a path into a
//! buffered stream. The stream is an owned value, released on drop.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// Something that can open a path as a buffered byte stream.
pub trait Source {
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>>;
}

/// Reads from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSource;

impl Source for FsSource {
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Serves bytes the host already holds in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the contents for a path.
    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    pub fn remove(&mut self, path: &Path) -> Option<Vec<u8>> {
        self.files.remove(path)
    }
}

impl Source for MemorySource {
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        let bytes = self.files.get(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not registered", path.display()))
        })?;
        Ok(Box::new(Cursor::new(bytes.as_slice())))
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        (**self).open(path)
    }
}
