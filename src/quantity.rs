#[macro_use]
pub mod macros;

pub mod cost;
pub mod electric;
pub mod energy;
pub mod mass;
pub mod power;
pub mod ratios;
pub mod time;

#[cfg(test)]
mod tests {
    use crate::quantity::{
        electric::{AmpereHours, Amperes, Volts},
        energy::{KilowattHours, WattHours},
        power::{Kilowatts, Watts},
        time::{Hours, Seconds},
    };

    #[test]
    fn test_ordering() {
        assert!(Watts(1.0) < Watts(2.0));
        assert_eq!(Watts(1.0).max(Watts(2.0)), Watts(2.0));
        assert_eq!(Watts(-3.0).min(Watts(2.0)), Watts(-3.0));
        assert_eq!(Watts(f64::NAN), Watts(f64::NAN));
    }

    #[test]
    fn test_display() {
        assert_eq!(Kilowatts(1.23456).to_string(), "1.235 kW");
        assert_eq!(format!("{:.1}", Volts(3.684)), "3.7 V");
    }

    #[test]
    fn test_products() {
        assert_eq!(Watts(100.0) * Hours(2.0), WattHours(200.0));
        assert_eq!(WattHours(200.0) / Hours(2.0), Watts(100.0));
        assert_eq!(Volts(4.0) * AmpereHours(25.0), WattHours(100.0));
        assert_eq!(Watts(100.0) / Volts(4.0), Amperes(25.0));
        assert_eq!(KilowattHours(3.0) / Kilowatts(1.5), Hours(2.0));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Hours::from(Seconds(5400.0)), Hours(1.5));
        assert_eq!(Seconds::from(Hours(0.5)), Seconds(1800.0));
        assert_eq!(KilowattHours::from(WattHours(1500.0)), KilowattHours(1.5));
        assert_eq!(Watts::from(Kilowatts(2.0)), Watts(2000.0));
    }

    #[test]
    fn test_ratio() {
        assert_eq!(WattHours(50.0) / WattHours(200.0), 0.25);
    }
}
