use crate::quantity::{
    electric::{Amperes, Volts},
    energy::{KilowattHours, WattHours},
    time::Hours,
};

quantity!(Watts, suffix: "W", precision: 0);
quantity!(Kilowatts, suffix: "kW", precision: 3);

product!(Watts * Hours = WattHours);
product!(Kilowatts * Hours = KilowattHours);
product!(Volts * Amperes = Watts);

impl From<Kilowatts> for Watts {
    fn from(kilowatts: Kilowatts) -> Self {
        Self(kilowatts.0 * 1000.0)
    }
}

impl From<Watts> for Kilowatts {
    fn from(watts: Watts) -> Self {
        Self(watts.0 / 1000.0)
    }
}
