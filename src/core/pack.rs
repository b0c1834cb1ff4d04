use bon::bon;
use serde::Serialize;

use crate::{
    core::{
        cell::CellSpec,
        error::{Error, Result},
        integrate::CumulativeTrapezoid,
    },
    prelude::*,
    quantity::{
        cost::Cost,
        electric::Volts,
        energy::{KilowattHours, WattHours},
        mass::Kilograms,
        power::Watts,
        ratios::Percentage,
        time::Hours,
    },
};

/// Series-parallel assembly of identical cells.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Pack {
    /// Cells per string.
    pub series: u32,

    /// Number of strings, zero when the subsystem never needs to deliver energy.
    pub parallel: u32,

    pub cost: Cost,

    /// Nominal energy, rounded to 10 Wh.
    pub energy: KilowattHours,

    pub nominal_voltage: Volts,
    pub weight: Kilograms,

    /// Worst-case cumulative energy excursion the pack was sized for.
    pub required_energy: WattHours,
}

impl Pack {
    #[must_use]
    pub const fn n_cells(&self) -> u32 {
        self.series * self.parallel
    }

    /// No strings at all, the rounded energy of a small pack may still read zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.parallel == 0
    }
}

/// Sizes a pack of the given cell for a power sub-series.
#[must_use]
#[derive(Copy, Clone)]
pub struct PackSizer<'a> {
    cell: &'a CellSpec,
    series: u32,
    depth_of_discharge: Percentage,
}

#[bon]
impl<'a> PackSizer<'a> {
    #[builder]
    pub fn new(
        cell: &'a CellSpec,
        target_voltage: Volts,
        depth_of_discharge: Percentage,
    ) -> Result<Self> {
        if !(depth_of_discharge > Percentage::ZERO && depth_of_discharge <= Percentage(100.0)) {
            return Err(Error::invalid_parameter(
                "depth_of_discharge",
                format!("must be within (0, 100], got {depth_of_discharge}"),
            ));
        }
        if !(target_voltage.is_finite() && target_voltage > Volts::ZERO) {
            return Err(Error::invalid_parameter(
                "target_voltage",
                format!("must be positive, got {target_voltage}"),
            ));
        }
        let series = (target_voltage / cell.nominal_voltage).round_ties_even();
        if series < 1.0 {
            return Err(Error::invalid_parameter(
                "target_voltage",
                format!(
                    "{target_voltage} is too low for a string of `{}` cells at {}",
                    cell.name, cell.nominal_voltage,
                ),
            ));
        }
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let series = series as u32;
        Ok(Self { cell, series, depth_of_discharge })
    }
}

impl PackSizer<'_> {
    /// Size the pack for the power sub-series given on the hour time axis.
    ///
    /// The required energy is the running maximum of the cumulative integral, so that
    /// a charging tail does not hide the discharge excursion before it.
    pub fn size(&self, power: impl Iterator<Item = (Hours, Watts)>) -> Pack {
        let required_energy =
            power.cumulative_trapezoid().fold(WattHours::ZERO, WattHours::max);
        let cell_energy = self.cell.energy();
        let min_cells = (required_energy / cell_energy) / self.depth_of_discharge.to_proportion();

        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let parallel = (min_cells / f64::from(self.series)).ceil() as u32;

        let n_cells = f64::from(self.series * parallel);
        let pack = Pack {
            series: self.series,
            parallel,
            cost: self.cell.cost * n_cells,
            energy: KilowattHours::from(cell_energy * n_cells).round_to(2),
            nominal_voltage: self.cell.nominal_voltage * f64::from(self.series),
            weight: self.cell.weight * n_cells,
            required_energy,
        };
        trace!(cell = %self.cell.name, ?pack, min_cells, "sized");
        pack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{
            cell::tests::cell,
            profile::LoadProfile,
            subsystem::{Hybrid, Subsystem},
        },
        quantity::time::Seconds,
    };

    fn series(samples: &[(f64, f64)]) -> Vec<(Hours, Watts)> {
        samples.iter().map(|(time, power)| (Hours::from(Seconds(*time)), Watts(*power))).collect()
    }

    #[test]
    fn test_size() {
        // 1000 Wh over one hour, 3.76 kWh cells at 40 V:
        let cell = cell(40.0, 94.0, 100.0);
        let sizer = PackSizer::builder()
            .cell(&cell)
            .target_voltage(Volts(600.0))
            .depth_of_discharge(Percentage(80.0))
            .build()
            .unwrap();
        let pack = sizer.size(series(&[(0.0, 1000.0), (3600.0, 1000.0)]).into_iter());
        assert_eq!(pack.required_energy, WattHours(1000.0));
        assert_eq!(pack.series, 15);
        // N_min = (1000 / 3760) / 0.8 = 0.332…, a single string suffices:
        assert_eq!(pack.parallel, 1);
        assert_eq!(pack.n_cells(), 15);
        assert!(f64::from(pack.n_cells()) >= (1000.0 / 3760.0 / 0.8_f64).ceil());
        assert_eq!(pack.cost, Cost(1500.0));
        assert_eq!(pack.energy, KilowattHours(56.4));
        assert_eq!(pack.nominal_voltage, Volts(600.0));
    }

    #[test]
    fn test_series_rounds_half_to_even() {
        let cell = cell(4.0, 10.0, 1.0);
        let sizer = |voltage| {
            PackSizer::builder()
                .cell(&cell)
                .target_voltage(Volts(voltage))
                .depth_of_discharge(Percentage(100.0))
                .build()
                .unwrap()
                .size(std::iter::empty())
                .series
        };
        assert_eq!(sizer(10.0), 2);
        assert_eq!(sizer(14.0), 4);
        assert_eq!(sizer(13.9), 3);
    }

    #[test]
    fn test_running_maximum() {
        // +500 Wh, then -1000 Wh: the net integral is negative but the excursion is not.
        let cell = cell(4.0, 25.0, 1.0);
        let sizer = PackSizer::builder()
            .cell(&cell)
            .target_voltage(Volts(4.0))
            .depth_of_discharge(Percentage(100.0))
            .build()
            .unwrap();
        let pack = sizer.size(
            series(&[(0.0, 500.0), (3600.0, 500.0), (3600.0, -1000.0), (7200.0, -1000.0)])
                .into_iter(),
        );
        assert_eq!(pack.required_energy, WattHours(500.0));
        assert_eq!(pack.parallel, 5);
    }

    #[test]
    fn test_idle_subsystem_is_empty() {
        let cell = cell(4.0, 25.0, 1.0);
        let sizer = PackSizer::builder()
            .cell(&cell)
            .target_voltage(Volts(400.0))
            .depth_of_discharge(Percentage(80.0))
            .build()
            .unwrap();
        let pack = sizer.size(series(&[(0.0, 0.0), (3600.0, 0.0)]).into_iter());
        assert_eq!(pack.parallel, 0);
        assert_eq!(pack.cost, Cost::ZERO);
        assert!(pack.is_empty());
    }

    #[test]
    fn test_small_pack_is_not_empty() {
        // 1 Wh from 1.2 Wh cells at 80 % DoD needs two cells, 2.4 Wh rounds to 0.00 kWh:
        let cell = cell(1.2, 1.0, 1.0);
        let sizer = PackSizer::builder()
            .cell(&cell)
            .target_voltage(Volts(1.2))
            .depth_of_discharge(Percentage(80.0))
            .build()
            .unwrap();
        let pack = sizer.size(series(&[(0.0, 1.0), (3600.0, 1.0)]).into_iter());
        assert_eq!(pack.parallel, 2);
        assert_eq!(pack.n_cells(), 2);
        assert_eq!(pack.energy, KilowattHours::ZERO);
        assert!(!pack.is_empty());
    }

    #[test]
    fn test_parallel_count_never_grows_with_depth_of_discharge() {
        let cell = cell(3.7, 94.0, 100.0);
        let profile = LoadProfile::try_from_samples([
            (0.0, 250_000.0),
            (1800.0, 400_000.0),
            (3600.0, 50_000.0),
        ])
        .unwrap()
        .split(|_, power| Hybrid::new(power, Watts::ZERO));
        let mut previous = u32::MAX;
        for depth_of_discharge in 1..=100 {
            let pack = PackSizer::builder()
                .cell(&cell)
                .target_voltage(Volts(800.0))
                .depth_of_discharge(Percentage(f64::from(depth_of_discharge)))
                .build()
                .unwrap()
                .size(profile.share(Subsystem::HighEnergy));
            assert!(pack.parallel <= previous, "DoD {depth_of_discharge}%");
            previous = pack.parallel;
        }
    }

    #[test]
    fn test_rejects_zero_depth_of_discharge() {
        let cell = cell(3.7, 94.0, 100.0);
        let result = PackSizer::builder()
            .cell(&cell)
            .target_voltage(Volts(800.0))
            .depth_of_discharge(Percentage::ZERO)
            .build();
        assert!(matches!(result, Err(Error::InvalidParameter { name: "depth_of_discharge", .. })));
    }

    #[test]
    fn test_rejects_too_low_voltage() {
        let cell = cell(3.7, 94.0, 100.0);
        let result = PackSizer::builder()
            .cell(&cell)
            .target_voltage(Volts(1.0))
            .depth_of_discharge(Percentage(80.0))
            .build();
        assert!(matches!(result, Err(Error::InvalidParameter { name: "target_voltage", .. })));
    }
}
