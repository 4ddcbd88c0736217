use crate::errors::{BenchError, BenchResult};
use crate::plan::{BenchmarkPlan, PlanState, SweepValue, TIMESTAMP_FORMAT};
use crate::sample::RawSample;
use chrono::Local;
use tracing::{debug, info, warn};

/// Receives progress notifications while a sweep runs
pub trait RunObserver {
    fn point_started(&mut self, _plan: &str, _sweep_value: SweepValue, _repetitions: usize) {}

    fn sample_recorded(
        &mut self,
        _plan: &str,
        _sweep_value: SweepValue,
        _repetition: usize,
        _sample: &RawSample,
    ) {
    }

    fn run_finished(&mut self, _plan: &str) {}
}

/// Drives a plan's measurement over every sweep value, one call at a time
#[derive(Default)]
pub struct SweepRunner {
    observer: Option<Box<dyn RunObserver>>,
}

impl SweepRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(observer: Box<dyn RunObserver>) -> Self {
        Self {
            observer: Some(observer),
        }
    }

    /// Run the sweep, replacing any samples left by an earlier run.
    ///
    /// Each sweep value is measured `repetitions` times in sweep order. The
    /// first failing measurement aborts the run and leaves the plan in
    /// [`PlanState::Started`] with the samples recorded up to that call. The
    /// failing point keeps its set even when its first repetition failed.
    pub fn run(&mut self, plan: &mut BenchmarkPlan) -> BenchResult<()> {
        if plan.state() != &PlanState::Unrun {
            warn!(
                "Re-running benchmark '{}', discarding {} previously collected points",
                plan.name(),
                plan.data().len()
            );
        }

        let started_at = Local::now();
        info!(
            "Starting Benchmark run at {}",
            started_at.format(TIMESTAMP_FORMAT)
        );
        plan.begin_run(started_at);

        let name = plan.name().to_string();
        let repetitions = plan.repetitions();
        let sweep = plan.sweep().to_vec();

        info!(
            "Benchmark '{}' ({}) sweeping {} points x {} repetitions, parameters {:?}",
            name,
            plan.measure_label(),
            sweep.len(),
            repetitions,
            plan.parameters()
        );

        for x in sweep {
            info!("Measuring '{}' at x={}", name, x);
            plan.begin_point(x);
            if let Some(observer) = self.observer.as_mut() {
                observer.point_started(&name, x, repetitions);
            }

            for r in 1..=repetitions {
                let measurement = plan.measure_once(x).map_err(|e| BenchError::ForeignCallFailure {
                    sweep_value: x,
                    repetition: r,
                    source: e.into(),
                })?;
                let sample = RawSample::from(measurement);
                debug!(
                    "x={} rep={} time={}ms items={} cas_success={} cas_fail={} steal={}",
                    x,
                    r,
                    sample.elapsed_ms,
                    sample.num_items,
                    sample.num_cas_success,
                    sample.num_cas_fail,
                    sample.num_steal
                );
                plan.record(x, sample);

                if let Some(observer) = self.observer.as_mut() {
                    observer.sample_recorded(&name, x, r, &sample);
                }
            }
        }

        plan.finish_run();
        if let Some(observer) = self.observer.as_mut() {
            observer.run_finished(&name);
        }
        info!("Benchmark '{}' finished", name);
        Ok(())
    }
}
