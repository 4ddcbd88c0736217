use crate::errors::{BenchError, BenchResult};
use crate::output_dir::OutputDir;
use crate::plan::{BenchmarkPlan, PlanState};
use crate::reporting::report_generators::{DataFileReport, ReportGenerator};
use crate::reporting::types::{RunReport, SummaryRow};
use crate::sample::{SampleSet, TIME_SCALE};
use chrono::{DateTime, Local};
use std::path::PathBuf;
use tracing::info;

/// Reduces collected samples to one summary row per sweep value
pub struct ResultAggregator;

impl ResultAggregator {
    /// Reduce one sample set.
    ///
    /// Elapsed times are averaged and the counters summed. The item count is
    /// taken from the last sample, on the assumption that it does not vary
    /// between repetitions of the same point.
    pub fn summarize(set: &SampleSet) -> BenchResult<SummaryRow> {
        let sweep_value = set.sweep_value();
        let last = set
            .samples()
            .last()
            .ok_or(BenchError::EmptySampleSet { sweep_value })?;

        let mut total_time = 0.0;
        let mut total_cas_success = 0i64;
        let mut total_cas_fail = 0i64;
        let mut total_steal = 0i64;
        for s in set.samples() {
            total_time += s.elapsed_ms;
            total_cas_success += s.num_cas_success;
            total_cas_fail += s.num_cas_fail;
            total_steal += s.num_steal;
        }

        let avg_time_ms = total_time / set.len() as f64;
        if avg_time_ms == 0.0 {
            return Err(BenchError::DivideByZero { sweep_value });
        }

        Ok(SummaryRow {
            sweep_value,
            num_items: last.num_items,
            avg_time_ms,
            throughput: last.num_items as f64 * TIME_SCALE / avg_time_ms,
            total_cas_success,
            total_cas_fail,
            total_steal,
        })
    }

    /// Summary rows for a completed run, in sweep order
    pub fn summarize_plan(plan: &BenchmarkPlan) -> BenchResult<Vec<SummaryRow>> {
        Self::completed_at(plan)?;
        plan.data().iter().map(Self::summarize).collect()
    }

    /// Write `<basedir>/data/<name>/<name>.data` and return its path
    pub fn write_averaged_data(plan: &mut BenchmarkPlan) -> BenchResult<PathBuf> {
        let mut written = Self::write_reports(plan, &[])?;
        Ok(written.remove(0))
    }

    /// Write the averaged data file followed by each extra report.
    ///
    /// Every row is computed before anything touches the disk, so a failed
    /// reduction leaves no partial output behind.
    pub fn write_reports(
        plan: &mut BenchmarkPlan,
        extra: &[&dyn ReportGenerator],
    ) -> BenchResult<Vec<PathBuf>> {
        let started_at = Self::completed_at(plan)?;
        let rows = plan
            .data()
            .iter()
            .map(Self::summarize)
            .collect::<BenchResult<Vec<_>>>()?;

        let output_dir = OutputDir::for_benchmark(plan.basedir(), plan.name());
        output_dir.ensure()?;

        let report = RunReport {
            name: plan.name(),
            parameters: plan.parameters(),
            repetitions: plan.repetitions(),
            started_at,
            samples: plan.data(),
            rows: &rows,
        };

        let mut written = vec![DataFileReport.generate(&report, &output_dir)?];
        for generator in extra {
            written.push(generator.generate(&report, &output_dir)?);
        }
        for path in &written {
            info!("Wrote {}", path.display());
        }

        plan.mark_persisted(written[0].clone());
        Ok(written)
    }

    fn completed_at(plan: &BenchmarkPlan) -> BenchResult<DateTime<Local>> {
        match plan.state() {
            PlanState::Unrun => Err(BenchError::NotRun {
                name: plan.name().to_string(),
            }),
            PlanState::Started { .. } => Err(BenchError::Interrupted {
                name: plan.name().to_string(),
            }),
            PlanState::Run { started_at } | PlanState::Persisted { started_at, .. } => {
                Ok(*started_at)
            }
        }
    }
}

impl BenchmarkPlan {
    /// Persist the averaged data of the last completed run
    pub fn write_averaged_data(&mut self) -> BenchResult<PathBuf> {
        ResultAggregator::write_averaged_data(self)
    }
}
