//! Text file scanning workload profiled by the `method-profiler` binary

use std::fs;
use std::io;
use std::path::Path;

crate::profiled_trait! {
    /// Line and word counting over text files
    pub trait TextScanner: Send + Sync {
        #[profiled]
        fn count_lines(&self, path: &Path) -> io::Result<usize>;
        #[profiled]
        fn count_words(&self, path: &Path) -> io::Result<usize>;
        /// Scanner identifier, shown in output
        fn name(&self) -> String;
    }
}

/// Reads each file fully from disk on every call
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct FileScanner;

impl TextScanner for FileScanner {
    fn count_lines(&self, path: &Path) -> io::Result<usize> {
        Ok(fs::read_to_string(path)?.lines().count())
    }

    fn count_words(&self, path: &Path) -> io::Result<usize> {
        Ok(fs::read_to_string(path)?.split_whitespace().count())
    }

    fn name(&self) -> String {
        "file".to_string()
    }
}

/// Counts for one scanned file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileCounts {
    pub lines: usize,
    pub words: usize,
}

/// Scan `path` once through any scanner
pub fn scan<S: TextScanner + ?Sized>(scanner: &S, path: &Path) -> io::Result<FileCounts> {
    Ok(FileCounts {
        lines: scanner.count_lines(path)?,
        words: scanner.count_words(path)?,
    })
}
