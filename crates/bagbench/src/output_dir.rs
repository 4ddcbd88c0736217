use crate::errors::{BenchError, BenchResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding every file written for one benchmark,
/// `<basedir>/data/<name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
    pub path: PathBuf,
}

impl OutputDir {
    pub fn for_benchmark(basedir: &Path, name: &str) -> Self {
        OutputDir {
            path: basedir.join("data").join(name),
        }
    }

    /// Create the directory tree. An existing directory is not an error.
    pub fn ensure(&self) -> BenchResult<()> {
        fs::create_dir_all(&self.path).map_err(|e| BenchError::write_failure(&self.path, e))
    }

    pub fn file(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }
}
