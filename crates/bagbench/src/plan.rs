use crate::errors::{BenchError, BenchResult};
use crate::measure::Measure;
use crate::sample::{Measurement, RawSample, SampleData};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Format of run start timestamps in logs and summaries
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One point on the swept axis, typically a thread count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SweepValue(pub i32);

impl fmt::Display for SweepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for SweepValue {
    fn from(v: i32) -> Self {
        SweepValue(v)
    }
}

/// Lifecycle of a plan
#[derive(Debug, Clone, PartialEq)]
pub enum PlanState {
    /// Never run
    Unrun,
    /// A run started and has not completed, either still going or aborted
    Started { started_at: DateTime<Local> },
    /// Every sweep value received its full set of repetitions
    Run { started_at: DateTime<Local> },
    /// Averaged data was written to `path`
    Persisted {
        started_at: DateTime<Local>,
        path: PathBuf,
    },
}

impl PlanState {
    pub fn started_at(&self) -> Option<DateTime<Local>> {
        match self {
            PlanState::Unrun => None,
            PlanState::Started { started_at }
            | PlanState::Run { started_at }
            | PlanState::Persisted { started_at, .. } => Some(*started_at),
        }
    }
}

/// A benchmark sweeping one workload over a list of sweep values.
///
/// The configuration is fixed at construction. The plan owns the samples
/// collected by [`crate::runners::SweepRunner`] and tracks whether they are
/// complete enough to aggregate.
pub struct BenchmarkPlan {
    measure: Box<dyn Measure>,
    parameters: Vec<i32>,
    repetitions: usize,
    sweep: Vec<SweepValue>,
    basedir: PathBuf,
    name: String,
    data: SampleData,
    state: PlanState,
}

impl fmt::Debug for BenchmarkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchmarkPlan")
            .field("name", &self.name)
            .field("measure", &self.measure.label())
            .field("parameters", &self.parameters)
            .field("repetitions", &self.repetitions)
            .field("sweep", &self.sweep)
            .field("basedir", &self.basedir)
            .field("state", &self.state)
            .finish()
    }
}

impl BenchmarkPlan {
    pub fn new(
        measure: Box<dyn Measure>,
        parameters: Vec<i32>,
        repetitions: usize,
        sweep: Vec<SweepValue>,
        basedir: impl Into<PathBuf>,
        name: impl Into<String>,
    ) -> BenchResult<Self> {
        let name = name.into();
        if repetitions == 0 {
            return Err(BenchError::InvalidPlan(format!(
                "'{}' needs at least one repetition per point",
                name
            )));
        }
        if sweep.is_empty() {
            return Err(BenchError::InvalidPlan(format!(
                "'{}' has an empty sweep",
                name
            )));
        }
        if name.trim().is_empty() {
            return Err(BenchError::InvalidPlan(
                "benchmark name must not be empty".to_string(),
            ));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(BenchError::InvalidPlan(format!(
                "benchmark name '{}' must be a single path component",
                name
            )));
        }

        Ok(Self {
            measure,
            parameters,
            repetitions,
            sweep,
            basedir: basedir.into(),
            name,
            data: SampleData::new(),
            state: PlanState::Unrun,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[i32] {
        &self.parameters
    }

    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    pub fn sweep(&self) -> &[SweepValue] {
        &self.sweep
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    pub fn data(&self) -> &SampleData {
        &self.data
    }

    pub fn state(&self) -> &PlanState {
        &self.state
    }

    pub fn measure_label(&self) -> &str {
        self.measure.label()
    }

    /// Run the full sweep with a default runner
    pub fn run(&mut self) -> BenchResult<()> {
        crate::runners::SweepRunner::new().run(self)
    }

    pub(crate) fn begin_run(&mut self, started_at: DateTime<Local>) {
        self.data.clear();
        self.state = PlanState::Started { started_at };
    }

    pub(crate) fn begin_point(&mut self, sweep_value: SweepValue) {
        self.data.open(sweep_value);
    }

    pub(crate) fn measure_once(&mut self, sweep_value: SweepValue) -> anyhow::Result<Measurement> {
        self.measure.measure(sweep_value, &self.parameters)
    }

    pub(crate) fn record(&mut self, sweep_value: SweepValue, sample: RawSample) {
        self.data.record(sweep_value, sample);
    }

    pub(crate) fn finish_run(&mut self) {
        if let PlanState::Started { started_at } = self.state {
            self.state = PlanState::Run { started_at };
        }
    }

    pub(crate) fn mark_persisted(&mut self, path: PathBuf) {
        if let Some(started_at) = self.state.started_at() {
            self.state = PlanState::Persisted { started_at, path };
        }
    }
}
