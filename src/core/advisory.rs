use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{
    core::{
        cell::CellSpec,
        subsystem::{Hybrid, Subsystem},
    },
    quantity::{electric::Amperes, ratios::Percentage},
};

/// Non-fatal finding about the inputs or the sized system.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub enum Advisory {
    HighPowerCellStoresMoreEnergy,
    HighPowerCellDischargesSlower,

    /// The packs are discharged deeper than the initial charge allows.
    DepthOfDischargeExceedsInitialCharge {
        depth_of_discharge: Percentage,
        initial_soc: Percentage,
    },

    /// The sub-series do not add up to the total demand.
    PowerNotConserved,

    CurrentExceedsRating {
        subsystem: Subsystem,
        direction: Direction,
        peak: Amperes,
        rating: Amperes,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Direction {
    Discharge,
    Charge,
}

impl Display for Advisory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HighPowerCellStoresMoreEnergy => write!(
                f,
                "the selected high power (HP) cell contains more energy than the high energy (HE) cell",
            ),
            Self::HighPowerCellDischargesSlower => write!(
                f,
                "the selected high power (HP) cell has a lower discharge rate than the high energy (HE) cell",
            ),
            Self::DepthOfDischargeExceedsInitialCharge { depth_of_discharge, initial_soc } => {
                write!(
                    f,
                    "the depth of discharge ({depth_of_discharge}) is larger than the initial state of charge ({initial_soc})",
                )
            }
            Self::PowerNotConserved => {
                write!(f, "the sharing strategy does not conserve the total power")
            }
            Self::CurrentExceedsRating { subsystem, direction, peak, rating } => {
                let direction = match direction {
                    Direction::Discharge => "discharge",
                    Direction::Charge => "charge",
                };
                write!(
                    f,
                    "the peak {direction} current of the {subsystem} pack ({peak}) exceeds its rating ({rating})",
                )
            }
        }
    }
}

/// Compare the cells the way a designer would sanity-check a pairing.
///
/// Values are rounded to two decimals before comparing.
#[must_use]
pub fn compare_cells(cells: Hybrid<&CellSpec>) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    if round(cells.high_power.energy().0) > round(cells.high_energy.energy().0) {
        advisories.push(Advisory::HighPowerCellStoresMoreEnergy);
    }
    if round(cells.high_energy.max_discharge_rate) > round(cells.high_power.max_discharge_rate) {
        advisories.push(Advisory::HighPowerCellDischargesSlower);
    }
    advisories
}

fn round(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
