pub mod config;
pub mod errors;
pub mod ffi;
pub mod measure;
pub mod output_dir;
pub mod plan;
pub mod reporting;
pub mod runners;
pub mod sample;

// Re-export main components for easier use
pub use config::SuiteConfig;
pub use errors::{BenchError, BenchResult};
pub use measure::Measure;
pub use plan::{BenchmarkPlan, PlanState, SweepValue};
pub use reporting::{ResultAggregator, SummaryRow};
pub use runners::{BenchmarkSuite, SweepRunner};
pub use sample::{Measurement, RawSample, SampleSet};
