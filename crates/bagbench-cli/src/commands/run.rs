use crate::foreign::LibraryCache;
use anyhow::{bail, Result};
use bagbench::reporting::{JsonSummaryReport, RawSamplesReport, ReportGenerator};
use bagbench::runners::RunObserver;
use bagbench::{RawSample, SuiteConfig, SweepRunner, SweepValue};
use console::style;
use tracing::info;

pub struct RunOptions {
    pub only: Vec<String>,
    pub raw: bool,
    pub json: bool,
}

impl RunOptions {
    fn extra_reports(&self) -> Vec<&'static dyn ReportGenerator> {
        let mut reports: Vec<&'static dyn ReportGenerator> = Vec::new();
        if self.raw {
            reports.push(&RawSamplesReport);
        }
        if self.json {
            reports.push(&JsonSummaryReport);
        }
        reports
    }
}

/// Prints one line per completed sweep point
#[derive(Default)]
struct ConsoleProgress {
    repetitions: usize,
    total_ms: f64,
}

impl RunObserver for ConsoleProgress {
    fn point_started(&mut self, plan: &str, sweep_value: SweepValue, repetitions: usize) {
        self.repetitions = repetitions;
        self.total_ms = 0.0;
        eprint!(
            "{} x={} ",
            style(plan.trim()).cyan(),
            style(sweep_value).bold()
        );
    }

    fn sample_recorded(
        &mut self,
        _plan: &str,
        _sweep_value: SweepValue,
        repetition: usize,
        sample: &RawSample,
    ) {
        self.total_ms += sample.elapsed_ms;
        if repetition == self.repetitions {
            eprintln!(
                "{} {} reps, {} ms avg",
                style("done").green(),
                repetition,
                self.total_ms / repetition as f64
            );
        }
    }
}

pub fn handle_run(suite: &SuiteConfig, options: &RunOptions) -> Result<()> {
    let mut cache = LibraryCache::new();
    let mut plans = suite.build_suite(&options.only, |bench, library| cache.bind(bench, library))?;
    if plans.is_empty() {
        bail!("No benchmarks selected");
    }
    info!(
        "Bound {} benchmarks from {} libraries",
        plans.len(),
        cache.len()
    );

    let extra = options.extra_reports();
    let mut runner = SweepRunner::with_observer(Box::new(ConsoleProgress::default()));
    let data_files = plans.run(&mut runner, &extra)?;

    for path in data_files {
        println!("{}", path.display());
    }
    Ok(())
}
