use crate::errors::{BenchError, BenchResult};
use crate::output_dir::OutputDir;
use crate::reporting::types::{RunReport, RunSummary};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Column header of the averaged data file
pub const DATA_HEADER: [&str; 7] = [
    "x",
    "num_elems",
    "avg_time",
    "throughput",
    "num_CAS_success",
    "num_CAS_fails",
    "num_Steal",
];

/// Column header of the raw samples file
pub const RAW_HEADER: [&str; 7] = [
    "x",
    "rep",
    "time",
    "num_elems",
    "num_CAS_success",
    "num_CAS_fails",
    "num_Steal",
];

/// Shortest round-trip form; a decimal point in the normal range (`2.0`), an exponent at the extremes (`1e16`)
pub fn format_float(v: f64) -> String {
    format!("{:?}", v)
}

/// Trait for report generators
pub trait ReportGenerator {
    /// File name inside the benchmark's output directory
    fn file_name(&self, benchmark: &str) -> String;

    fn write(&self, report: &RunReport<'_>, out: &mut dyn Write) -> BenchResult<()>;

    /// Write the report into `output_dir`, replacing any earlier file
    fn generate(&self, report: &RunReport<'_>, output_dir: &OutputDir) -> BenchResult<PathBuf> {
        let path = output_dir.file(&self.file_name(report.name));
        let file = File::create(&path).map_err(|e| BenchError::write_failure(&path, e))?;
        let mut writer = BufWriter::new(file);

        self.write(report, &mut writer).map_err(|e| match e {
            BenchError::IoError(io) => BenchError::write_failure(&path, io),
            other => other,
        })?;
        writer
            .flush()
            .map_err(|e| BenchError::write_failure(&path, e))?;

        Ok(path)
    }
}

fn space_separated(out: &mut dyn Write) -> csv::Writer<&mut dyn Write> {
    csv::WriterBuilder::new()
        .delimiter(b' ')
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(out)
}

/// The averaged `<name>.data` file, one row per sweep value
pub struct DataFileReport;

impl ReportGenerator for DataFileReport {
    fn file_name(&self, benchmark: &str) -> String {
        format!("{}.data", benchmark)
    }

    fn write(&self, report: &RunReport<'_>, out: &mut dyn Write) -> BenchResult<()> {
        let mut wtr = space_separated(out);
        wtr.write_record(DATA_HEADER)?;
        for row in report.rows {
            wtr.write_record([
                row.sweep_value.to_string(),
                row.num_items.to_string(),
                format_float(row.avg_time_ms),
                format_float(row.throughput),
                row.total_cas_success.to_string(),
                row.total_cas_fail.to_string(),
                row.total_steal.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Every repetition as recorded, for distribution plots
pub struct RawSamplesReport;

impl ReportGenerator for RawSamplesReport {
    fn file_name(&self, benchmark: &str) -> String {
        format!("{}.raw", benchmark)
    }

    fn write(&self, report: &RunReport<'_>, out: &mut dyn Write) -> BenchResult<()> {
        let mut wtr = space_separated(out);
        wtr.write_record(RAW_HEADER)?;
        for set in report.samples.iter() {
            for (rep, s) in set.samples().iter().enumerate() {
                wtr.write_record([
                    set.sweep_value().to_string(),
                    (rep + 1).to_string(),
                    format_float(s.elapsed_ms),
                    s.num_items.to_string(),
                    s.num_cas_success.to_string(),
                    s.num_cas_fail.to_string(),
                    s.num_steal.to_string(),
                ])?;
            }
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Run metadata and summary rows as pretty JSON
pub struct JsonSummaryReport;

impl ReportGenerator for JsonSummaryReport {
    fn file_name(&self, benchmark: &str) -> String {
        format!("{}.summary.json", benchmark)
    }

    fn write(&self, report: &RunReport<'_>, out: &mut dyn Write) -> BenchResult<()> {
        serde_json::to_writer_pretty(&mut *out, &RunSummary::from(report))?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::SweepValue;
    use crate::reporting::types::SummaryRow;
    use crate::sample::{RawSample, SampleData};
    use chrono::{Local, TimeZone};
    use test_case::test_case;

    #[test_case(2.0, "2.0")]
    #[test_case(50000000.0, "50000000.0")]
    #[test_case(0.125, "0.125")]
    #[test_case(1234.5678, "1234.5678")]
    #[test_case(1e16, "1e16"; "large exponent")]
    #[test_case(f64::NAN, "NaN"; "not a number")]
    fn test_format_float(v: f64, expected: &str) {
        assert_eq!(format_float(v), expected);
    }

    fn fixture() -> (SampleData, Vec<SummaryRow>) {
        let mut samples = SampleData::new();
        for (x, t) in [(2, 1.5), (2, 2.5), (1, 4.0)] {
            samples.record(
                SweepValue(x),
                RawSample {
                    elapsed_ms: t,
                    num_items: 10,
                    num_cas_success: 1,
                    num_cas_fail: 2,
                    num_steal: 3,
                },
            );
        }
        let rows = vec![SummaryRow {
            sweep_value: SweepValue(2),
            num_items: 10,
            avg_time_ms: 2.0,
            throughput: 5000.0,
            total_cas_success: 2,
            total_cas_fail: 4,
            total_steal: 6,
        }];
        (samples, rows)
    }

    fn render(generator: &dyn ReportGenerator, samples: &SampleData, rows: &[SummaryRow]) -> String {
        let report = RunReport {
            name: "fixture",
            parameters: &[100],
            repetitions: 2,
            started_at: Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            samples,
            rows,
        };
        let mut buf = Vec::new();
        generator.write(&report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_data_file_layout() {
        let (samples, rows) = fixture();
        let text = render(&DataFileReport, &samples, &rows);
        assert_eq!(
            text,
            "x num_elems avg_time throughput num_CAS_success num_CAS_fails num_Steal\n\
             2 10 2.0 5000.0 2 4 6\n"
        );
    }

    #[test]
    fn test_raw_file_lists_every_repetition() {
        let (samples, rows) = fixture();
        let text = render(&RawSamplesReport, &samples, &rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], RAW_HEADER.join(" "));
        assert_eq!(lines[1], "2 1 1.5 10 1 2 3");
        assert_eq!(lines[2], "2 2 2.5 10 1 2 3");
        assert_eq!(lines[3], "1 1 4.0 10 1 2 3");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_json_summary() {
        let (samples, rows) = fixture();
        let text = render(&JsonSummaryReport, &samples, &rows);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["name"], "fixture");
        assert_eq!(value["started_at"], "2024-03-01T12:30:00");
        assert_eq!(value["rows"][0]["sweep_value"], 2);
        assert_eq!(value["rows"][0]["throughput"], 5000.0);
    }

    #[test]
    fn test_file_names() {
        assert_eq!(DataFileReport.file_name("b"), "b.data");
        assert_eq!(RawSamplesReport.file_name("b"), "b.raw");
        assert_eq!(JsonSummaryReport.file_name("b"), "b.summary.json");
    }
}
