use bon::bon;
use serde::Serialize;

use crate::{
    core::{
        curve::Curve,
        error::{Error, Result},
    },
    quantity::{
        cost::Cost,
        electric::{AmpereHours, Amperes, Volts},
        energy::WattHours,
        mass::Kilograms,
    },
};

/// Static characteristics of a single battery cell.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct CellSpec {
    pub name: String,
    pub capacity: AmpereHours,
    pub nominal_voltage: Volts,

    /// Maximum continuous discharge current as a multiple of the capacity.
    pub max_discharge_rate: f64,

    /// Maximum continuous charge current as a multiple of the capacity.
    pub max_charge_rate: f64,

    pub cost: Cost,
    pub weight: Kilograms,

    /// State-of-charge fraction to the open-circuit voltage of one cell.
    open_circuit_voltage: Curve,

    /// Cycle count to the state-of-health fraction.
    capacity_fade: Option<Curve>,
}

#[bon]
impl CellSpec {
    #[builder]
    pub fn new(
        #[builder(into)] name: String,
        capacity: AmpereHours,
        nominal_voltage: Volts,
        max_discharge_rate: f64,
        max_charge_rate: f64,
        cost: Cost,
        weight: Kilograms,
        open_circuit_voltage: Vec<(f64, Volts)>,
        #[builder(default)] capacity_fade: Vec<(f64, f64)>,
    ) -> Result<Self> {
        let invalid =
            |reason: &str| Error::InvalidCell { cell: name.clone(), reason: reason.into() };

        if !(capacity.is_finite() && capacity > AmpereHours::ZERO) {
            return Err(invalid("rated capacity must be positive"));
        }
        if !(nominal_voltage.is_finite() && nominal_voltage > Volts::ZERO) {
            return Err(invalid("nominal voltage must be positive"));
        }
        if !(cost.is_finite() && cost > Cost::ZERO) {
            return Err(invalid("cost must be positive"));
        }
        if !(weight.is_finite() && weight >= Kilograms::ZERO) {
            return Err(invalid("weight must not be negative"));
        }
        if !(max_discharge_rate.is_finite() && max_discharge_rate >= 0.0)
            || !(max_charge_rate.is_finite() && max_charge_rate >= 0.0)
        {
            return Err(invalid("C-rates must not be negative"));
        }

        let open_circuit_voltage = Curve::try_from_unsorted(
            open_circuit_voltage.into_iter().map(|(soc, voltage)| (soc, voltage.0)),
        )
        .map_err(|error| invalid(&format!("open-circuit voltage curve: {error}")))?;
        let capacity_fade = if capacity_fade.is_empty() {
            None
        } else {
            Some(
                Curve::try_from_unsorted(capacity_fade)
                    .map_err(|error| invalid(&format!("capacity fade curve: {error}")))?,
            )
        };

        Ok(Self {
            name,
            capacity,
            nominal_voltage,
            max_discharge_rate,
            max_charge_rate,
            cost,
            weight,
            open_circuit_voltage,
            capacity_fade,
        })
    }
}

impl CellSpec {
    /// Nominal energy of one cell.
    pub fn energy(&self) -> WattHours {
        self.nominal_voltage * self.capacity
    }

    /// Open-circuit voltage of one cell at the state-of-charge fraction.
    ///
    /// Extrapolates linearly beyond the measured curve.
    pub fn open_circuit_voltage(&self, state_of_charge: f64) -> Volts {
        Volts(self.open_circuit_voltage.evaluate(state_of_charge))
    }

    /// State-of-health fraction after the number of cycles, if the fade curve is known.
    #[must_use]
    pub fn state_of_health(&self, n_cycles: f64) -> Option<f64> {
        self.capacity_fade.as_ref().map(|curve| curve.evaluate(n_cycles))
    }

    pub fn max_discharge_current(&self) -> Amperes {
        Amperes(self.max_discharge_rate * self.capacity.0)
    }

    pub fn max_charge_current(&self) -> Amperes {
        Amperes(self.max_charge_rate * self.capacity.0)
    }

    /// Cost per kilowatt-hour of nominal energy.
    #[must_use]
    pub fn cost_density(&self) -> f64 {
        1000.0 * self.cost.0 / self.energy().0
    }

    /// Weight in kilograms per kilowatt-hour of nominal energy.
    #[must_use]
    pub fn weight_density(&self) -> f64 {
        1000.0 * self.weight.0 / self.energy().0
    }
}
