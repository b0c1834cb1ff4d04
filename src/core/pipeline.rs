use bon::Builder;
use serde::Serialize;

use crate::{
    core::{
        advisory::{Advisory, Direction, compare_cells},
        cell::CellSpec,
        charging::append_charging,
        error::{Error, Result},
        optimizer::{CostCurve, CostOptimizer},
        pack::{Pack, PackSizer},
        profile::{LoadProfile, SplitProfile},
        progress::Progress,
        sharing::{Resolution, Strategy},
        simulator::{Envelope, Simulation, Simulator},
        subsystem::{Hybrid, Subsystem},
    },
    prelude::*,
    quantity::{
        cost::Cost,
        electric::Volts,
        energy::KilowattHours,
        power::Kilowatts,
        ratios::Percentage,
    },
};

/// Everything needed to size and simulate a hybrid system for one load profile.
#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Scenario<'a> {
    profile: &'a LoadProfile,
    cells: Hybrid<&'a CellSpec>,
    strategy: Strategy,
    target_voltage: Volts,
    depth_of_discharge: Percentage,
    initial_soc: Percentage,
    charging_power: Kilowatts,
    cycles_per_year: f64,
    lifetime_years: f64,
}

impl<S: scenario_builder::IsComplete> ScenarioBuilder<'_, S> {
    pub fn run(self, progress: &mut dyn Progress) -> Result<Outcome> {
        self.build().run(progress)
    }
}

/// Sized pack with its trajectory diagnostics.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct PackReport {
    pub pack: Pack,

    /// [`None`] for an empty pack.
    pub envelope: Option<Envelope>,

    /// State of health at the end of the lifetime, if the cell fade curve is known.
    pub end_of_life_state_of_health: Option<Percentage>,
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct Outcome {
    pub strategy: Strategy,

    /// Winning parameter of a cost-seeking strategy.
    pub optimum: Option<f64>,

    /// [`None`] for a one-pass strategy.
    pub cost_curve: Option<CostCurve>,

    /// Split profile with the charging plateau.
    pub profile: SplitProfile,

    pub packs: Hybrid<PackReport>,
    pub simulation: Simulation,
    pub advisories: Vec<Advisory>,
}

impl Outcome {
    pub fn total_cost(&self) -> Cost {
        self.packs.map(|report| report.pack.cost).sum()
    }

    pub fn total_energy(&self) -> KilowattHours {
        self.packs.map(|report| report.pack.energy).sum()
    }
}

impl Scenario<'_> {
    #[instrument(
        skip_all,
        name = "Sizing…",
        fields(strategy = ?self.strategy, target_voltage = %self.target_voltage),
    )]
    fn run(self, progress: &mut dyn Progress) -> Result<Outcome> {
        if !(self.cycles_per_year.is_finite() && self.cycles_per_year >= 0.0) {
            return Err(Error::invalid_parameter("cycles_per_year", "must not be negative"));
        }
        if !(self.lifetime_years.is_finite() && self.lifetime_years >= 0.0) {
            return Err(Error::invalid_parameter("lifetime_years", "must not be negative"));
        }
        let sizers = self.cells.try_map(|cell| {
            PackSizer::builder()
                .cell(cell)
                .target_voltage(self.target_voltage)
                .depth_of_discharge(self.depth_of_discharge)
                .build()
        })?;

        let mut advisories = compare_cells(self.cells);
        if self.depth_of_discharge > self.initial_soc {
            advisories.push(Advisory::DepthOfDischargeExceedsInitialCharge {
                depth_of_discharge: self.depth_of_discharge,
                initial_soc: self.initial_soc,
            });
        }
        if !self.strategy.conserves_power() {
            advisories.push(Advisory::PowerNotConserved);
        }

        let (split, optimum, cost_curve) = self.share(progress)?;
        debug!(conservation_error = %split.conservation_error(), ?optimum, "shared");
        let profile = append_charging(split, self.charging_power)?;
        let packs = Hybrid::from_fn(|subsystem| sizers[subsystem].size(profile.share(subsystem)));
        for (subsystem, pack) in packs.iter() {
            info!(
                subsystem = subsystem.abbreviation(),
                series = pack.series,
                parallel = pack.parallel,
                cost = %pack.cost,
                "sized"
            );
        }

        let simulation = Simulator::builder()
            .cells(self.cells)
            .packs(packs)
            .initial_soc(self.initial_soc)
            .simulate(&profile);
        let n_cycles = self.cycles_per_year * self.lifetime_years;
        let packs = Hybrid::from_fn(|subsystem| PackReport {
            pack: packs[subsystem],
            envelope: simulation.envelope(subsystem),
            end_of_life_state_of_health: self.cells[subsystem]
                .state_of_health(n_cycles)
                .map(Percentage::from_proportion),
        });
        for (subsystem, report) in packs.iter() {
            advisories.extend(self.check_currents(subsystem, report));
        }

        for advisory in &advisories {
            warn!("{advisory}");
        }
        Ok(Outcome {
            strategy: self.strategy,
            optimum,
            cost_curve,
            profile,
            packs,
            simulation,
            advisories,
        })
    }

    fn share(
        &self,
        progress: &mut dyn Progress,
    ) -> Result<(SplitProfile, Option<f64>, Option<CostCurve>)> {
        match self.strategy.resolve() {
            Resolution::OnePass(rule) => Ok((rule.apply(self.profile), None, None)),
            Resolution::Sweep(sweep) => {
                let optimum = CostOptimizer::builder()
                    .profile(self.profile)
                    .cells(self.cells)
                    .target_voltage(self.target_voltage)
                    .depth_of_discharge(self.depth_of_discharge)
                    .sweep(sweep)
                    .optimize(progress)?;
                Ok((optimum.profile, Some(optimum.parameter), Some(optimum.cost_curve)))
            }
        }
    }

    /// Compare the peak currents against the continuous ratings of all strings together.
    fn check_currents(&self, subsystem: Subsystem, report: &PackReport) -> Vec<Advisory> {
        let Some(envelope) = report.envelope else {
            return Vec::new();
        };
        let cell = self.cells[subsystem];
        let parallel = f64::from(report.pack.parallel);
        [
            (Direction::Discharge, envelope.max_discharge_current, cell.max_discharge_current()),
            (Direction::Charge, envelope.max_charge_current, cell.max_charge_current()),
        ]
        .into_iter()
        .filter_map(|(direction, peak, rating)| {
            let rating = rating * parallel;
            (peak > rating).then_some(Advisory::CurrentExceedsRating {
                subsystem,
                direction,
                peak,
                rating,
            })
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        core::{cell::tests::cell, progress::tests::Silent},
        quantity::power::Watts,
    };

    fn run(profile: &LoadProfile, strategy: Strategy, cells: Hybrid<&CellSpec>) -> Result<Outcome> {
        Scenario::builder()
            .profile(profile)
            .cells(cells)
            .strategy(strategy)
            .target_voltage(Volts(40.0))
            .depth_of_discharge(Percentage(80.0))
            .initial_soc(Percentage(90.0))
            .charging_power(Kilowatts(1.0))
            .cycles_per_year(365.0)
            .lifetime_years(2.0)
            .run(&mut Silent)
    }

    fn ramp() -> LoadProfile {
        LoadProfile::try_from_samples([
            (0.0, 0.0),
            (1800.0, 2000.0),
            (3600.0, 1000.0),
            (5400.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_power_proportional() {
        let high_energy = cell(10.0, 10.0, 1.0);
        let high_power = cell(5.0, 4.0, 1.0);
        let profile = ramp();
        let outcome =
            run(&profile, Strategy::PowerProportional, Hybrid::new(&high_energy, &high_power))
                .unwrap();

        assert_eq!(outcome.profile.len(), profile.points().len() + 2);
        assert!(outcome.profile.conservation_error() < Watts(1e-9));
        assert_eq!(outcome.simulation.steps.len(), outcome.profile.len());
        assert!(outcome.cost_curve.is_none());
        assert!(outcome.optimum.is_none());

        for (_, report) in outcome.packs.iter() {
            assert!(report.pack.parallel >= 1);
            let envelope = report.envelope.unwrap();
            // Packs are sized for 80 % DoD and start at 90 %:
            assert!(envelope.min_state_of_charge >= Percentage(10.0 - 1e-9));
            assert_abs_diff_eq!(envelope.max_state_of_charge.0, 90.0, epsilon = 1e-9);
        }
        // 730 cycles on the 1000-cycle fade curve:
        assert_abs_diff_eq!(
            outcome.packs.high_energy.end_of_life_state_of_health.unwrap().0,
            92.7,
            epsilon = 1e-9
        );
        assert_eq!(
            outcome.total_cost(),
            outcome.packs.high_energy.pack.cost + outcome.packs.high_power.pack.cost
        );
    }

    #[test]
    fn test_cost_optimal_split() {
        let high_energy = cell(10.0, 10.0, 1.0);
        let high_power = cell(10.0, 10.0, 5.0);
        let outcome =
            run(&ramp(), Strategy::CostOptimalSplit, Hybrid::new(&high_energy, &high_power))
                .unwrap();
        assert_eq!(outcome.optimum, Some(100.0));
        let cost_curve = outcome.cost_curve.as_ref().unwrap();
        assert_eq!(cost_curve.points.len(), 101);
        assert_eq!(cost_curve.minimum().map(|(_, cost)| cost), Some(outcome.total_cost()));
        assert!(outcome.packs.high_power.pack.is_empty());
        assert!(outcome.packs.high_power.envelope.is_none());
    }

    #[test]
    fn test_advisories() {
        let high_energy = cell(10.0, 10.0, 1.0);
        let high_power = cell(10.0, 20.0, 1.0);
        let outcome =
            run(&ramp(), Strategy::FixedDefault, Hybrid::new(&high_energy, &high_power)).unwrap();
        assert!(outcome.advisories.contains(&Advisory::HighPowerCellStoresMoreEnergy));
        assert!(outcome.advisories.contains(&Advisory::PowerNotConserved));
    }

    #[test]
    fn test_current_exceeds_rating() {
        // 36 kW for ten seconds discharges a 400 Wh pack far beyond 2C:
        let cell = cell(10.0, 10.0, 1.0);
        let profile = LoadProfile::try_from_samples([(0.0, 36_000.0), (10.0, 36_000.0)]).unwrap();
        let outcome = run(
            &profile,
            Strategy::FixedSplit { high_energy_share: Percentage::ZERO },
            Hybrid::new(&cell, &cell),
        )
        .unwrap();
        assert!(outcome.advisories.iter().any(|advisory| matches!(
            advisory,
            Advisory::CurrentExceedsRating {
                subsystem: Subsystem::HighPower,
                direction: Direction::Discharge,
                ..
            }
        )));
    }

    #[test]
    fn test_depth_of_discharge_exceeds_initial_charge() {
        let cell = cell(10.0, 10.0, 1.0);
        let outcome = Scenario::builder()
            .profile(&ramp())
            .cells(Hybrid::new(&cell, &cell))
            .strategy(Strategy::PowerProportional)
            .target_voltage(Volts(40.0))
            .depth_of_discharge(Percentage(95.0))
            .initial_soc(Percentage(90.0))
            .charging_power(Kilowatts(1.0))
            .cycles_per_year(365.0)
            .lifetime_years(20.0)
            .run(&mut Silent)
            .unwrap();
        assert!(outcome.advisories.contains(&Advisory::DepthOfDischargeExceedsInitialCharge {
            depth_of_discharge: Percentage(95.0),
            initial_soc: Percentage(90.0),
        }));
    }

    #[test]
    fn test_idle_profile_cannot_be_charged() {
        let cell = cell(10.0, 10.0, 1.0);
        let result =
            run(&LoadProfile::flat_zero(), Strategy::PowerProportional, Hybrid::new(&cell, &cell));
        assert!(matches!(result, Err(Error::Degenerate(_))));
    }
}
