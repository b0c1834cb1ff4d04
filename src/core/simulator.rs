use bon::Builder;
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

use crate::{
    core::{
        cell::CellSpec,
        pack::Pack,
        profile::{Split, SplitProfile},
        subsystem::{Hybrid, Subsystem},
    },
    prelude::*,
    quantity::{
        electric::{Amperes, Volts},
        energy::KilowattHours,
        power::Watts,
        ratios::Percentage,
        time::Seconds,
    },
};

/// Electrical state of one subsystem at a sample.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct SubsystemState {
    /// Not clamped, may leave `0..=100` on an undersized pack.
    pub state_of_charge: Percentage,

    /// Open-circuit voltage of the pack.
    pub voltage: Volts,

    pub current: Amperes,
}

#[derive(Copy, Clone, Debug, Serialize)]
pub struct Step {
    pub time: Seconds,
    pub power: Split<Watts>,
    pub energy: Split<KilowattHours>,

    /// [`None`] for a subsystem with an empty pack.
    pub states: Hybrid<Option<SubsystemState>>,

    /// Sum of the subsystem currents.
    pub current: Amperes,
}

/// Trajectory extremes of one subsystem.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Envelope {
    pub min_state_of_charge: Percentage,
    pub max_state_of_charge: Percentage,
    pub min_voltage: Volts,
    pub max_voltage: Volts,

    /// Largest discharge current, or zero if the pack never discharges.
    pub max_discharge_current: Amperes,

    /// Largest charge current as a positive value, or zero if the pack never charges.
    pub max_charge_current: Amperes,
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct Simulation {
    pub steps: Vec<Step>,
}

impl Simulation {
    /// Trajectory extremes of the subsystem, or [`None`] if its pack is empty.
    #[must_use]
    pub fn envelope(&self, subsystem: Subsystem) -> Option<Envelope> {
        let states = self.steps.iter().filter_map(|step| step.states[subsystem]).collect_vec();
        let (min_state_of_charge, max_state_of_charge) =
            bounds(states.iter().map(|state| state.state_of_charge))?;
        let (min_voltage, max_voltage) = bounds(states.iter().map(|state| state.voltage))?;
        let (min_current, max_current) = bounds(states.iter().map(|state| state.current))?;
        Some(Envelope {
            min_state_of_charge,
            max_state_of_charge,
            min_voltage,
            max_voltage,
            max_discharge_current: max_current.max(Amperes::ZERO),
            max_charge_current: (-min_current).max(Amperes::ZERO),
        })
    }
}

fn bounds<T: Copy + Ord>(values: impl Iterator<Item = T>) -> Option<(T, T)> {
    match values.minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(value) => Some((value, value)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

/// Reconstructs the state-of-charge, voltage and current trajectories of sized packs.
#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Simulator<'a> {
    cells: Hybrid<&'a CellSpec>,
    packs: Hybrid<Pack>,
    initial_soc: Percentage,
}

impl<S: simulator_builder::IsComplete> SimulatorBuilder<'_, S> {
    pub fn simulate(self, profile: &SplitProfile) -> Simulation {
        self.build().simulate(profile)
    }
}

impl Simulator<'_> {
    #[instrument(skip_all, fields(n_points = profile.len()))]
    fn simulate(&self, profile: &SplitProfile) -> Simulation {
        let steps = profile
            .points()
            .iter()
            .zip(profile.cumulative_energy())
            .map(|(point, energy)| {
                let states = Hybrid::from_fn(|subsystem| {
                    self.state(subsystem, point.value.shares[subsystem], energy.shares[subsystem])
                });
                let current = states
                    .iter()
                    .filter_map(|(_, state)| state.as_ref().map(|state| state.current))
                    .sum();
                Step { time: point.time, power: point.value, energy, states, current }
            })
            .collect();
        Simulation { steps }
    }

    fn state(
        &self,
        subsystem: Subsystem,
        power: Watts,
        energy: KilowattHours,
    ) -> Option<SubsystemState> {
        let pack = &self.packs[subsystem];
        if pack.is_empty() {
            return None;
        }
        let cell = self.cells[subsystem];
        let capacity = KilowattHours::from(cell.energy() * f64::from(pack.n_cells()));
        let state_of_charge = self.initial_soc - Percentage::from_proportion(energy / capacity);
        let voltage = cell.open_circuit_voltage(state_of_charge.to_proportion())
            * f64::from(pack.series);
        Some(SubsystemState { state_of_charge, voltage, current: power / voltage })
    }
}
