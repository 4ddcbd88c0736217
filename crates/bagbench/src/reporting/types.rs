use crate::plan::SweepValue;
use crate::sample::SampleData;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Reduced statistics for one sweep value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub sweep_value: SweepValue,
    /// Item count of the last sample in the set
    pub num_items: i64,
    pub avg_time_ms: f64,
    /// Items per second
    pub throughput: f64,
    pub total_cas_success: i64,
    pub total_cas_fail: i64,
    pub total_steal: i64,
}

/// Everything a report generator needs about one completed run
#[derive(Debug, Clone, Copy)]
pub struct RunReport<'a> {
    pub name: &'a str,
    pub parameters: &'a [i32],
    pub repetitions: usize,
    pub started_at: DateTime<Local>,
    pub samples: &'a SampleData,
    pub rows: &'a [SummaryRow],
}

/// Serialized form of a run summary
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub name: &'a str,
    pub parameters: &'a [i32],
    pub repetitions: usize,
    pub started_at: String,
    pub rows: &'a [SummaryRow],
}

impl<'a> From<&RunReport<'a>> for RunSummary<'a> {
    fn from(report: &RunReport<'a>) -> Self {
        Self {
            name: report.name,
            parameters: report.parameters,
            repetitions: report.repetitions,
            started_at: report
                .started_at
                .format(crate::plan::TIMESTAMP_FORMAT)
                .to_string(),
            rows: report.rows,
        }
    }
}
