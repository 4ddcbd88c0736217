pub mod aggregator;
pub mod report_generators;
pub mod types;

pub use aggregator::ResultAggregator;
pub use report_generators::{
    format_float, DataFileReport, JsonSummaryReport, RawSamplesReport, ReportGenerator,
};
pub use types::{RunReport, RunSummary, SummaryRow};
