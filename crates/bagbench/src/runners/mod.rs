pub mod suite_runner;
pub mod sweep_runner;

pub use suite_runner::BenchmarkSuite;
pub use sweep_runner::{RunObserver, SweepRunner};
