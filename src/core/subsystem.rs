use std::{
    fmt::{Display, Formatter},
    ops::{Add, Index},
};

use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum Subsystem {
    HighEnergy,
    HighPower,
}

impl Subsystem {
    pub const ALL: [Self; 2] = [Self::HighEnergy, Self::HighPower];

    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::HighEnergy => "HE",
            Self::HighPower => "HP",
        }
    }
}

impl Display for Subsystem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HighEnergy => write!(f, "high energy (HE)"),
            Self::HighPower => write!(f, "high power (HP)"),
        }
    }
}

/// One value per subsystem.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Hybrid<T> {
    pub high_energy: T,
    pub high_power: T,
}

impl<T> Hybrid<T> {
    pub const fn new(high_energy: T, high_power: T) -> Self {
        Self { high_energy, high_power }
    }

    pub fn from_fn(mut f: impl FnMut(Subsystem) -> T) -> Self {
        Self { high_energy: f(Subsystem::HighEnergy), high_power: f(Subsystem::HighPower) }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Hybrid<U> {
        Hybrid { high_energy: f(self.high_energy), high_power: f(self.high_power) }
    }

    pub const fn as_ref(&self) -> Hybrid<&T> {
        Hybrid { high_energy: &self.high_energy, high_power: &self.high_power }
    }

    /// Iterate over `(subsystem, value)` in the high-energy, high-power order.
    pub fn iter(&self) -> impl Iterator<Item = (Subsystem, &T)> {
        Subsystem::ALL.into_iter().map(|subsystem| (subsystem, &self[subsystem]))
    }

    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<Hybrid<U>, E> {
        Ok(Hybrid { high_energy: f(self.high_energy)?, high_power: f(self.high_power)? })
    }
}

impl<T: Add<Output = T>> Hybrid<T> {
    pub fn sum(self) -> T {
        self.high_energy + self.high_power
    }
}

impl<T> Index<Subsystem> for Hybrid<T> {
    type Output = T;

    fn index(&self, subsystem: Subsystem) -> &Self::Output {
        match subsystem {
            Subsystem::HighEnergy => &self.high_energy,
            Subsystem::HighPower => &self.high_power,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index() {
        let hybrid = Hybrid::new(1, 2);
        assert_eq!(hybrid[Subsystem::HighEnergy], 1);
        assert_eq!(hybrid[Subsystem::HighPower], 2);
    }

    #[test]
    fn test_from_fn() {
        let hybrid = Hybrid::from_fn(Subsystem::abbreviation);
        assert_eq!(hybrid, Hybrid::new("HE", "HP"));
    }

    #[test]
    fn test_map_and_sum() {
        assert_eq!(Hybrid::new(1, 2).map(|value| value * 10).sum(), 30);
    }

    #[test]
    fn test_try_map_short_circuits() {
        let result: Result<Hybrid<u32>, &str> = Hybrid::new(1, 0).try_map(|value| {
            if value == 0 { Err("zero") } else { Ok(value) }
        });
        assert_eq!(result, Err("zero"));
    }
}
