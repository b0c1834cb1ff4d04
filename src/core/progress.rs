use crate::quantity::ratios::Percentage;

/// Sink for long-running computations.
pub trait Progress {
    /// Called with a non-decreasing percentage.
    fn report(&mut self, percent: Percentage, label: &str);

    /// Polled between work chunks; returning `true` aborts the computation.
    fn is_cancelled(&self) -> bool {
        false
    }
}
