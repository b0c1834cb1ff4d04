use average::Mean;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    core::{
        error::{Error, Result},
        integrate::CumulativeTrapezoid,
        subsystem::{Hybrid, Subsystem},
    },
    quantity::{
        energy::{KilowattHours, WattHours},
        power::{Kilowatts, Watts},
        time::{Hours, Seconds},
    },
};

/// A time series point.
#[derive(Copy, Clone, Debug, PartialEq, derive_more::Constructor, Serialize)]
pub struct Point<V> {
    pub time: Seconds,
    pub value: V,
}

impl<V> Point<V> {
    pub fn hours(&self) -> Hours {
        Hours::from(self.time)
    }
}

/// Total demand power over time, discharging is positive.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct LoadProfile(Vec<Point<Watts>>);

impl LoadProfile {
    pub fn try_new(points: Vec<Point<Watts>>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::InvalidProfile(format!(
                "at least 2 samples are required, got {}",
                points.len(),
            )));
        }
        if let Some(index) =
            points.iter().position(|point| !point.time.is_finite() || !point.value.is_finite())
        {
            return Err(Error::InvalidProfile(format!("sample #{index} is not finite")));
        }
        if let Some((index, _)) =
            points.iter().tuple_windows().enumerate().find(|(_, (from, to))| from.time >= to.time)
        {
            return Err(Error::InvalidProfile(format!(
                "time of sample #{} does not strictly increase",
                index + 1,
            )));
        }
        Ok(Self(points))
    }

    /// Build the profile from `(seconds, watts)` pairs.
    pub fn try_from_samples(samples: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        Self::try_new(
            samples
                .into_iter()
                .map(|(time, power)| Point::new(Seconds(time), Watts(power)))
                .collect(),
        )
    }

    /// Two-point profile of zero power over one hour.
    pub fn flat_zero() -> Self {
        Self(vec![Point::new(Seconds(0.0), Watts::ZERO), Point::new(Seconds(3600.0), Watts::ZERO)])
    }

    #[must_use]
    pub fn points(&self) -> &[Point<Watts>] {
        &self.0
    }

    #[must_use]
    pub fn peak_power(&self) -> Watts {
        self.0.iter().map(|point| point.value).fold(Watts(f64::NEG_INFINITY), Watts::max)
    }

    /// Split every sample with the one-pass `rule`.
    pub fn split(&self, mut rule: impl FnMut(usize, Watts) -> Hybrid<Watts>) -> SplitProfile {
        SplitProfile(
            self.0
                .iter()
                .enumerate()
                .map(|(index, point)| {
                    let shares = rule(index, point.value);
                    Point::new(point.time, Split { total: point.value, shares })
                })
                .collect(),
        )
    }

    pub fn metrics(&self) -> ProfileMetrics {
        let peak_power = Kilowatts::from(self.peak_power());
        let mean_power = {
            let estimate: Mean = self.0.iter().map(|point| point.value.0).collect();
            Kilowatts::from(Watts(estimate.mean()))
        };
        let peak_to_average_ratio = (mean_power != Kilowatts::ZERO)
            .then(|| 10.0 * ((peak_power.0 * peak_power.0) / (mean_power.0 * mean_power.0)).ln());
        let required_energy = self
            .0
            .iter()
            .map(|point| (point.hours(), point.value))
            .cumulative_trapezoid()
            .last()
            .unwrap_or(WattHours::ZERO);
        ProfileMetrics {
            peak_power,
            mean_power,
            peak_to_average_ratio,
            required_energy: required_energy.into(),
        }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct ProfileMetrics {
    pub peak_power: Kilowatts,

    /// Arithmetic mean over the samples, not weighted by time.
    pub mean_power: Kilowatts,

    /// Peak-to-average power ratio in decibels, or [`None`] for a zero-mean profile.
    ///
    /// Computed with the natural logarithm.
    pub peak_to_average_ratio: Option<f64>,

    /// Net time integral of the power.
    pub required_energy: KilowattHours,
}

/// Total value and its per-subsystem shares.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Split<T> {
    pub total: T,
    pub shares: Hybrid<T>,
}

/// Load profile extended with the high-energy and high-power sub-series.
///
/// Time is non-decreasing: the charging plateau repeats the last timestamp.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct SplitProfile(Vec<Point<Split<Watts>>>);

impl SplitProfile {
    #[must_use]
    pub fn points(&self) -> &[Point<Split<Watts>>] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Point<Split<Watts>>> {
        self.0.last()
    }

    pub(crate) fn extend(&mut self, points: impl IntoIterator<Item = Point<Split<Watts>>>) {
        self.0.extend(points);
    }

    /// Power sub-series of the subsystem on the hour time axis.
    pub fn share(&self, subsystem: Subsystem) -> impl Iterator<Item = (Hours, Watts)> {
        self.0.iter().map(move |point| (point.hours(), point.value.shares[subsystem]))
    }

    /// Largest absolute deviation of `HE + HP` from the total.
    #[must_use]
    pub fn conservation_error(&self) -> Watts {
        self.0
            .iter()
            .map(|point| (point.value.shares.sum() - point.value.total).abs())
            .fold(Watts::ZERO, Watts::max)
    }

    /// Cumulative energy of the total and both shares, starting with zero.
    pub fn cumulative_energy(&self) -> Vec<Split<KilowattHours>> {
        let total = self.0.iter().map(|point| (point.hours(), point.value.total));
        let high_energy = self.share(Subsystem::HighEnergy);
        let high_power = self.share(Subsystem::HighPower);
        total
            .cumulative_trapezoid::<_, _, WattHours>()
            .zip(high_energy.cumulative_trapezoid::<_, _, WattHours>())
            .zip(high_power.cumulative_trapezoid::<_, _, WattHours>())
            .map(|((total, high_energy), high_power)| Split {
                total: total.into(),
                shares: Hybrid::new(high_energy, high_power).map(KilowattHours::from),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn profile(samples: &[(f64, f64)]) -> LoadProfile {
        LoadProfile::try_from_samples(samples.iter().copied()).unwrap()
    }

    #[test]
    fn test_too_short() {
        let result = LoadProfile::try_new(vec![Point::new(Seconds(0.0), Watts(1.0))]);
        assert!(matches!(result, Err(Error::InvalidProfile(_))));
    }

    #[test]
    fn test_time_must_increase() {
        let result = LoadProfile::try_new(vec![
            Point::new(Seconds(0.0), Watts(1.0)),
            Point::new(Seconds(10.0), Watts(1.0)),
            Point::new(Seconds(10.0), Watts(1.0)),
        ]);
        assert!(matches!(result, Err(Error::InvalidProfile(_))));
    }

    #[test]
    fn test_metrics() {
        let metrics = profile(&[(0.0, 1000.0), (3600.0, 3000.0)]).metrics();
        assert_eq!(metrics.peak_power, Kilowatts(3.0));
        assert_eq!(metrics.mean_power, Kilowatts(2.0));
        assert_abs_diff_eq!(
            metrics.peak_to_average_ratio.unwrap(),
            10.0 * 2.25_f64.ln(),
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(metrics.required_energy.0, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_mean_has_no_ratio() {
        assert_eq!(LoadProfile::flat_zero().metrics().peak_to_average_ratio, None);
    }

    #[test]
    fn test_cumulative_energy() {
        let split = profile(&[(0.0, 1000.0), (3600.0, 1000.0), (7200.0, 2000.0)])
            .split(|_, power| Hybrid::new(power * 0.25, power * 0.75));
        let energy = split.cumulative_energy();
        assert_eq!(energy.len(), 3);
        assert_eq!(energy[0], Split::default());
        assert_abs_diff_eq!(energy[2].total.0, 2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(energy[2].shares.high_energy.0, 0.625, epsilon = 1e-9);
        assert_abs_diff_eq!(energy[2].shares.high_power.0, 1.875, epsilon = 1e-9);
    }
}
