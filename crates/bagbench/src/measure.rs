use crate::plan::SweepValue;
use crate::sample::Measurement;

/// A workload that can be measured at one sweep value.
///
/// Implementations receive the sweep value first and the plan's parameter
/// tuple second, and block until the workload finishes.
pub trait Measure {
    fn measure(&mut self, sweep_value: SweepValue, parameters: &[i32])
        -> anyhow::Result<Measurement>;

    /// Short label used in log lines
    fn label(&self) -> &str {
        "measurement"
    }
}

impl<F> Measure for F
where
    F: FnMut(SweepValue, &[i32]) -> anyhow::Result<Measurement>,
{
    fn measure(
        &mut self,
        sweep_value: SweepValue,
        parameters: &[i32],
    ) -> anyhow::Result<Measurement> {
        self(sweep_value, parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_receives_sweep_value_then_parameters() {
        let mut seen = Vec::new();
        let mut m = |x: SweepValue, params: &[i32]| -> anyhow::Result<Measurement> {
            seen.push((x, params.to_vec()));
            Ok(Measurement::default())
        };
        m.measure(SweepValue(6), &[100000, 3]).unwrap();
        assert_eq!(seen, vec![(SweepValue(6), vec![100000, 3])]);
    }
}
