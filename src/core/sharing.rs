mod gradient;

use serde::Serialize;

use crate::{
    core::{
        optimizer::Sweep,
        profile::{LoadProfile, SplitProfile},
        subsystem::Hybrid,
    },
    quantity::{power::Watts, ratios::Percentage},
};

/// How the total demand is shared between the subsystems.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub enum Strategy {
    /// Constant high-energy share of every sample.
    FixedSplit { high_energy_share: Percentage },

    /// High-power fraction proportional to the sample power relative to the peak.
    PowerProportional,

    /// High-power fraction proportional to the normalised power step.
    GradientProportional,

    /// Legacy fallback: `HE = 0.1·P`, `HP = 0.2·P`.
    ///
    /// Does not conserve the total power.
    FixedDefault,

    /// Cheapest fixed split over whole percents.
    CostOptimalSplit,

    /// Cheapest high-energy power ceiling.
    CostOptimalLimit,
}

impl Strategy {
    /// Resolve the strategy to either a one-pass rule or a parameter sweep.
    pub const fn resolve(self) -> Resolution {
        match self {
            Self::FixedSplit { high_energy_share } => {
                Resolution::OnePass(Rule::FixedSplit(high_energy_share))
            }
            Self::PowerProportional => Resolution::OnePass(Rule::PowerProportional),
            Self::GradientProportional => Resolution::OnePass(Rule::GradientProportional),
            Self::FixedDefault => Resolution::OnePass(Rule::FixedDefault),
            Self::CostOptimalSplit => Resolution::Sweep(Sweep::SplitFraction),
            Self::CostOptimalLimit => Resolution::Sweep(Sweep::PowerLimit),
        }
    }

    #[must_use]
    pub const fn conserves_power(self) -> bool {
        !matches!(self, Self::FixedDefault)
    }
}

pub enum Resolution {
    OnePass(Rule),
    Sweep(Sweep),
}

/// Parametrised one-pass sharing rule.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Rule {
    FixedSplit(Percentage),
    PowerProportional,
    GradientProportional,
    FixedDefault,

    /// High-energy power ceiling, the excess goes to the high-power subsystem.
    Limit(Watts),
}

impl Rule {
    pub fn apply(self, profile: &LoadProfile) -> SplitProfile {
        match self {
            Self::FixedSplit(high_energy_share) => {
                let fraction = high_energy_share.to_proportion();
                profile.split(|_, power| Hybrid::new(power * fraction, power * (1.0 - fraction)))
            }
            Self::PowerProportional => {
                let peak_power = profile.peak_power();
                profile.split(|_, power| {
                    let fraction = if peak_power == Watts::ZERO { 0.0 } else { power / peak_power };
                    by_high_power_fraction(power, fraction)
                })
            }
            Self::GradientProportional => {
                let fractions = gradient::high_power_fractions(profile);
                profile.split(|index, power| by_high_power_fraction(power, fractions[index]))
            }
            Self::FixedDefault => profile.split(|_, power| Hybrid::new(power * 0.1, power * 0.2)),
            Self::Limit(limit) => profile.split(|_, power| {
                if power < limit {
                    Hybrid::new(power, Watts::ZERO)
                } else {
                    Hybrid::new(limit, power - limit)
                }
            }),
        }
    }
}

fn by_high_power_fraction(power: Watts, fraction: f64) -> Hybrid<Watts> {
    Hybrid::new(power * (1.0 - fraction), power * fraction)
}
