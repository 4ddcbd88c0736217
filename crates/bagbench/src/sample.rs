use crate::plan::SweepValue;
use serde::Serialize;

/// Factor applied to the native elapsed time (seconds) at capture, giving milliseconds
pub const TIME_SCALE: f64 = 1000.0;

/// Result of a single measurement call, in the callee's native units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    /// Elapsed wall time in seconds
    pub elapsed: f64,
    pub num_items: i64,
    pub num_cas_success: i64,
    pub num_cas_fail: i64,
    pub num_steal: i64,
}

/// One recorded repetition, with elapsed time rescaled to milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawSample {
    pub elapsed_ms: f64,
    pub num_items: i64,
    pub num_cas_success: i64,
    pub num_cas_fail: i64,
    pub num_steal: i64,
}

impl From<Measurement> for RawSample {
    fn from(m: Measurement) -> Self {
        Self {
            elapsed_ms: m.elapsed * TIME_SCALE,
            num_items: m.num_items,
            num_cas_success: m.num_cas_success,
            num_cas_fail: m.num_cas_fail,
            num_steal: m.num_steal,
        }
    }
}

/// All samples taken at one sweep value, in recording order
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    sweep_value: SweepValue,
    samples: Vec<RawSample>,
}

impl SampleSet {
    pub fn new(sweep_value: SweepValue) -> Self {
        Self {
            sweep_value,
            samples: Vec::new(),
        }
    }

    pub fn sweep_value(&self) -> SweepValue {
        self.sweep_value
    }

    pub fn samples(&self) -> &[RawSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn push(&mut self, sample: RawSample) {
        self.samples.push(sample);
    }
}

/// Insertion-ordered mapping from sweep value to its samples.
///
/// Sweeps are a handful of points, so lookups scan linearly and keep the
/// first-seen order without a second index. Repeated sweep values land in
/// the set created for their first occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleData {
    sets: Vec<SampleSet>,
}

impl SampleData {
    pub fn new() -> Self {
        Self::default()
    }

    /// The set for `sweep_value`, created empty on first use
    pub fn open(&mut self, sweep_value: SweepValue) -> &mut SampleSet {
        let index = match self.sets.iter().position(|s| s.sweep_value == sweep_value) {
            Some(index) => index,
            None => {
                self.sets.push(SampleSet::new(sweep_value));
                self.sets.len() - 1
            }
        };
        &mut self.sets[index]
    }

    /// Append a sample under `sweep_value`
    pub fn record(&mut self, sweep_value: SweepValue, sample: RawSample) {
        self.open(sweep_value).push(sample);
    }

    pub fn get(&self, sweep_value: SweepValue) -> Option<&SampleSet> {
        self.sets.iter().find(|s| s.sweep_value == sweep_value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SampleSet> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn clear(&mut self) {
        self.sets.clear();
    }
}
