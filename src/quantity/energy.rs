use crate::quantity::electric::{AmpereHours, Volts};

quantity!(WattHours, suffix: "Wh", precision: 1);
quantity!(KilowattHours, suffix: "kWh", precision: 2);

product!(Volts * AmpereHours = WattHours);

impl From<KilowattHours> for WattHours {
    fn from(value: KilowattHours) -> Self {
        Self(value.0 * 1000.0)
    }
}

impl From<WattHours> for KilowattHours {
    fn from(value: WattHours) -> Self {
        Self(value.0 / 1000.0)
    }
}

impl KilowattHours {
    /// Round to the given number of decimal places.
    #[must_use]
    pub fn round_to(self, decimals: i32) -> Self {
        let scale = 10_f64.powi(decimals);
        Self((self.0 * scale).round() / scale)
    }
}
