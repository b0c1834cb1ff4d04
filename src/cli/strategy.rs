use clap::{Parser, ValueEnum};

use crate::{core::sharing::Strategy, prelude::*, quantity::ratios::Percentage};

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Policy {
    /// Fixed split of every sample.
    Split,

    /// HP share proportional to the sample power relative to the peak.
    Power,

    /// HP share proportional to the power step.
    Gradient,

    /// Legacy fixed 10 % and 20 % shares, which do not conserve power.
    #[value(alias = "cost")]
    FixedDefault,

    /// Cheapest fixed split.
    CostSplit,

    /// Cheapest HE power ceiling.
    CostLimit,
}

#[derive(Copy, Clone, Parser)]
pub struct StrategyArgs {
    /// Energy management strategy.
    #[clap(long = "strategy", env = "HBESS_STRATEGY", default_value = "power")]
    pub policy: Policy,

    /// HE share of the fixed split.
    #[clap(long = "split-percent", env = "HBESS_SPLIT_PERCENT", default_value = "50")]
    pub split: Percentage,
}

impl StrategyArgs {
    pub fn strategy(self) -> Result<Strategy> {
        Ok(match self.policy {
            Policy::Split => {
                ensure!(
                    self.split >= Percentage::ZERO && self.split <= Percentage(100.0),
                    "the split must be within 0..=100 %, got {}",
                    self.split,
                );
                Strategy::FixedSplit { high_energy_share: self.split }
            }
            Policy::Power => Strategy::PowerProportional,
            Policy::Gradient => Strategy::GradientProportional,
            Policy::FixedDefault => Strategy::FixedDefault,
            Policy::CostSplit => Strategy::CostOptimalSplit,
            Policy::CostLimit => Strategy::CostOptimalLimit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_out_of_range() {
        let args = StrategyArgs { policy: Policy::Split, split: Percentage(120.0) };
        assert!(args.strategy().is_err());
    }

    #[test]
    fn test_split_is_ignored_by_other_policies() {
        let args = StrategyArgs { policy: Policy::CostLimit, split: Percentage(120.0) };
        assert_eq!(args.strategy().unwrap(), Strategy::CostOptimalLimit);
    }
}
