use itertools::{Itertools, MinMaxResult};

use crate::{core::profile::LoadProfile, quantity::power::Watts};

/// High-power fraction of the first sample, which has no preceding step.
const FIRST_SAMPLE_FRACTION: f64 = 0.5;

/// High-power fraction of every sample, proportional to the power step from the previous one.
///
/// The steps are shifted by the magnitude of the smallest step and divided by the step range.
/// A profile with a constant step gets zero everywhere except the first sample.
pub fn high_power_fractions(profile: &LoadProfile) -> Vec<f64> {
    let steps = profile
        .points()
        .iter()
        .tuple_windows()
        .map(|(from, to)| to.value - from.value)
        .collect_vec();
    let (min_step, max_step) = match steps.iter().copied().minmax() {
        MinMaxResult::NoElements => (Watts::ZERO, Watts::ZERO),
        MinMaxResult::OneElement(step) => (step, step),
        MinMaxResult::MinMax(min_step, max_step) => (min_step, max_step),
    };
    let range = max_step - min_step;
    let shift = min_step.abs();
    let mut fractions = Vec::with_capacity(steps.len() + 1);
    fractions.push(FIRST_SAMPLE_FRACTION);
    fractions.extend(steps.into_iter().map(|step| {
        let fraction = (step + shift) / range;
        if fraction.is_finite() { fraction } else { 0.0 }
    }));
    fractions
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_high_power_fractions() {
        let profile =
            LoadProfile::try_from_samples([(0.0, 0.0), (1.0, 10.0), (2.0, 0.0), (3.0, 0.0)])
                .unwrap();
        // Steps: 10, -10, 0. Shifted: 20, 0, 10. Range: 20.
        assert_abs_diff_eq!(
            high_power_fractions(&profile)[..],
            [0.5, 1.0, 0.0, 0.5][..],
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_constant_step() {
        let profile =
            LoadProfile::try_from_samples([(0.0, 0.0), (1.0, 10.0), (2.0, 20.0)]).unwrap();
        assert_abs_diff_eq!(
            high_power_fractions(&profile)[..],
            [0.5, 0.0, 0.0][..],
            epsilon = 1e-9
        );
    }
}
