use bon::Builder;
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    core::{
        cell::CellSpec,
        error::{Error, Result},
        pack::PackSizer,
        profile::{LoadProfile, SplitProfile},
        progress::Progress,
        sharing::Rule,
        subsystem::{Hybrid, Subsystem},
    },
    prelude::*,
    quantity::{cost::Cost, electric::Volts, power::Watts, ratios::Percentage},
};

/// Maximum number of power-limit candidates before the step grows.
const LIMIT_RESOLUTION: f64 = 500.0;

/// Strategy parameter swept by the optimizer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Sweep {
    /// High-energy share in whole percents.
    SplitFraction,

    /// High-energy power ceiling in watts.
    PowerLimit,
}

impl Sweep {
    /// Candidate parameters in ascending order.
    #[must_use]
    pub fn candidates(self, profile: &LoadProfile) -> Vec<f64> {
        match self {
            Self::SplitFraction => (0..=100).map(f64::from).collect(),
            Self::PowerLimit => {
                let peak_power = profile.peak_power().0;
                if peak_power <= 0.0 {
                    return vec![0.0];
                }
                #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let step = (peak_power / LIMIT_RESOLUTION).round_ties_even().max(1.0) as usize;
                #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let upper = peak_power.ceil() as u64;
                #[expect(clippy::cast_precision_loss)]
                let candidates = (0..=upper).step_by(step).map(|limit| limit as f64).collect();
                candidates
            }
        }
    }

    pub const fn rule(self, parameter: f64) -> Rule {
        match self {
            Self::SplitFraction => Rule::FixedSplit(Percentage(parameter)),
            Self::PowerLimit => Rule::Limit(Watts(parameter)),
        }
    }

    #[must_use]
    pub const fn parameter_name(self) -> &'static str {
        match self {
            Self::SplitFraction => "HE share",
            Self::PowerLimit => "HE power limit",
        }
    }

    #[must_use]
    pub const fn parameter_unit(self) -> &'static str {
        match self {
            Self::SplitFraction => "%",
            Self::PowerLimit => "W",
        }
    }
}

/// Total pack cost per swept parameter value.
#[derive(Clone, Debug, Serialize)]
pub struct CostCurve {
    pub sweep: Sweep,
    pub points: Vec<(f64, Cost)>,
}

impl CostCurve {
    /// Cheapest point, the lowest parameter wins a tie.
    #[must_use]
    pub fn minimum(&self) -> Option<(f64, Cost)> {
        self.points.iter().copied().min_by_key(|(_, cost)| *cost)
    }
}

#[must_use]
pub struct Optimum {
    pub parameter: f64,
    pub cost: Cost,

    /// Profile split with the winning parameter.
    pub profile: SplitProfile,

    pub cost_curve: CostCurve,
}

/// Brute-force search of the cheapest strategy parameter.
#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct CostOptimizer<'a> {
    profile: &'a LoadProfile,
    cells: Hybrid<&'a CellSpec>,
    target_voltage: Volts,
    depth_of_discharge: Percentage,
    sweep: Sweep,
}

impl<S: cost_optimizer_builder::IsComplete> CostOptimizerBuilder<'_, S> {
    pub fn optimize(self, progress: &mut dyn Progress) -> Result<Optimum> {
        self.build().optimize(progress)
    }
}

impl CostOptimizer<'_> {
    #[instrument(skip_all, name = "Optimising…", fields(sweep = ?self.sweep))]
    fn optimize(self, progress: &mut dyn Progress) -> Result<Optimum> {
        let sizers = self.cells.try_map(|cell| {
            PackSizer::builder()
                .cell(cell)
                .target_voltage(self.target_voltage)
                .depth_of_discharge(self.depth_of_discharge)
                .build()
        })?;
        let candidates = self.sweep.candidates(self.profile);
        let label = format!("Sweeping the {}…", self.sweep.parameter_name());
        debug!(n_candidates = candidates.len(), "sweeping…");

        let n_candidates = candidates.len();
        let mut costs = vec![Cost::ZERO; n_candidates];
        let chunk_size = n_candidates.div_ceil(100);
        let mut n_evaluated = 0;
        progress.report(Percentage::ZERO, &label);
        for (cost_chunk, candidate_chunk) in
            costs.chunks_mut(chunk_size).zip(candidates.chunks(chunk_size))
        {
            if progress.is_cancelled() {
                warn!(n_evaluated, n_candidates, "cancelled");
                return Err(Error::Cancelled);
            }
            cost_chunk
                .par_iter_mut()
                .zip(candidate_chunk.par_iter())
                .for_each(|(cost, parameter)| *cost = self.evaluate(&sizers, *parameter));
            n_evaluated += candidate_chunk.len();
            #[expect(clippy::cast_precision_loss)]
            let proportion = n_evaluated as f64 / n_candidates as f64;
            progress.report(Percentage::from_proportion(proportion), &label);
        }

        let cost_curve =
            CostCurve { sweep: self.sweep, points: candidates.into_iter().zip(costs).collect() };
        let (parameter, cost) = cost_curve.minimum().ok_or(Error::Degenerate("no candidates"))?;
        info!(parameter, %cost, "optimised");
        Ok(Optimum {
            parameter,
            cost,
            profile: self.sweep.rule(parameter).apply(self.profile),
            cost_curve,
        })
    }

    fn evaluate(&self, sizers: &Hybrid<PackSizer<'_>>, parameter: f64) -> Cost {
        let profile = self.sweep.rule(parameter).apply(self.profile);
        Subsystem::ALL
            .into_iter()
            .map(|subsystem| sizers[subsystem].size(profile.share(subsystem)).cost)
            .sum()
    }
}
