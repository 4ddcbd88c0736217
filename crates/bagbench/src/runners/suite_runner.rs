use crate::errors::BenchResult;
use crate::plan::BenchmarkPlan;
use crate::reporting::{ReportGenerator, ResultAggregator};
use crate::runners::sweep_runner::SweepRunner;
use std::path::PathBuf;
use tracing::info;

/// An ordered list of independent plans, run one after another
#[derive(Debug, Default)]
pub struct BenchmarkSuite {
    plans: Vec<BenchmarkPlan>,
}

impl BenchmarkSuite {
    pub fn new(plans: Vec<BenchmarkPlan>) -> Self {
        Self { plans }
    }

    pub fn push(&mut self, plan: BenchmarkPlan) {
        self.plans.push(plan);
    }

    pub fn plans(&self) -> &[BenchmarkPlan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Run and persist every plan in order, stopping at the first error.
    ///
    /// Returns the averaged data file of each plan.
    pub fn run(
        &mut self,
        runner: &mut SweepRunner,
        extra_reports: &[&dyn ReportGenerator],
    ) -> BenchResult<Vec<PathBuf>> {
        info!("Running {} benchmarks", self.plans.len());
        let mut data_files = Vec::with_capacity(self.plans.len());
        for plan in self.plans.iter_mut() {
            runner.run(plan)?;
            let written = ResultAggregator::write_reports(plan, extra_reports)?;
            data_files.push(written[0].clone());
        }
        Ok(data_files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BenchError;
    use crate::measure::Measure;
    use crate::plan::{PlanState, SweepValue};
    use crate::sample::Measurement;
    use tempfile::tempdir;

    fn fixed(elapsed: f64) -> Box<dyn Measure> {
        Box::new(move |_: SweepValue, _: &[i32]| -> anyhow::Result<Measurement> {
            Ok(Measurement {
                elapsed,
                num_items: 10,
                ..Default::default()
            })
        })
    }

    #[test]
    fn test_runs_plans_in_order_and_stops_on_error() {
        let tmp = tempdir().unwrap();
        let sweep = vec![SweepValue(1), SweepValue(2)];
        let mut suite = BenchmarkSuite::default();
        suite.push(
            BenchmarkPlan::new(fixed(0.5), vec![], 2, sweep.clone(), tmp.path(), "first").unwrap(),
        );
        suite.push(
            BenchmarkPlan::new(fixed(0.0), vec![], 2, sweep.clone(), tmp.path(), "zero").unwrap(),
        );
        suite.push(
            BenchmarkPlan::new(fixed(0.5), vec![], 2, sweep, tmp.path(), "never").unwrap(),
        );

        let err = suite.run(&mut SweepRunner::new(), &[]).unwrap_err();

        assert!(matches!(err, BenchError::DivideByZero { .. }));
        assert!(matches!(
            suite.plans()[0].state(),
            PlanState::Persisted { .. }
        ));
        assert!(matches!(suite.plans()[1].state(), PlanState::Run { .. }));
        assert_eq!(suite.plans()[2].state(), &PlanState::Unrun);
        assert!(tmp.path().join("data/first/first.data").is_file());
        assert!(!tmp.path().join("data/zero").exists());
        assert!(!tmp.path().join("data/never").exists());
    }

    #[test]
    fn test_returns_data_files() {
        let tmp = tempdir().unwrap();
        let mut suite = BenchmarkSuite::new(vec![BenchmarkPlan::new(
            fixed(0.25),
            vec![1],
            1,
            vec![SweepValue(4)],
            tmp.path(),
            "only",
        )
        .unwrap()]);

        let files = suite.run(&mut SweepRunner::new(), &[]).unwrap();
        assert_eq!(files, vec![tmp.path().join("data/only/only.data")]);
    }
}
