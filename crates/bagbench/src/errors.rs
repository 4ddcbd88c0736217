use crate::plan::SweepValue;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while running or persisting a benchmark plan
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Benchmark '{name}' was not run. Run before writing data.")]
    NotRun { name: String },

    #[error("Benchmark '{name}' was interrupted before completing its sweep")]
    Interrupted { name: String },

    #[error("Measurement failed at x={sweep_value} (repetition {repetition}): {source}")]
    ForeignCallFailure {
        sweep_value: SweepValue,
        repetition: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Mean elapsed time is zero at x={sweep_value}, throughput is undefined")]
    DivideByZero { sweep_value: SweepValue },

    #[error("No samples recorded at x={sweep_value}")]
    EmptySampleSet { sweep_value: SweepValue },

    #[error("Invalid benchmark plan: {0}")]
    InvalidPlan(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to write {}: {source}", .path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to serialize JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for benchmark operations
pub type BenchResult<T> = Result<T, BenchError>;

impl BenchError {
    /// Wrap an I/O error with the path it occurred on
    pub fn write_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BenchError::OutputWriteFailure {
            path: path.into(),
            source,
        }
    }
}

impl From<toml::de::Error> for BenchError {
    fn from(err: toml::de::Error) -> Self {
        BenchError::ConfigError(err.to_string())
    }
}

impl From<csv::Error> for BenchError {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(e) => BenchError::IoError(e),
            other => BenchError::IoError(io::Error::new(
                io::ErrorKind::Other,
                format!("{:?}", other),
            )),
        }
    }
}
