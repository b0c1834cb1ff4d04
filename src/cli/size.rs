use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};

use crate::{
    cli::{input::InputArgs, sizing::SizingArgs, strategy::StrategyArgs},
    core::{pipeline::Scenario, progress::Progress},
    prelude::*,
    quantity::ratios::Percentage,
    tables::{
        build_advisories_table,
        build_cells_table,
        build_cost_curve_table,
        build_metrics_table,
        build_packs_table,
        build_trajectory_table,
    },
};

#[derive(Parser)]
pub struct SizeArgs {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub strategy: StrategyArgs,

    #[clap(flatten)]
    pub sizing: SizingArgs,

    /// Print the simulated time series.
    #[clap(long, env = "HBESS_TRAJECTORIES")]
    pub trajectories: bool,
}

#[instrument(skip_all)]
pub fn size(args: &SizeArgs) -> Result {
    let should_terminate = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGTERM, Arc::clone(&should_terminate))?;
    signal_hook::flag::register(SIGINT, Arc::clone(&should_terminate))?;

    let profile = args.input.load_profile();
    let cells = args.input.cells()?;
    let strategy = args.strategy.strategy()?;

    let metrics = profile.metrics();
    info!(
        n_points = profile.points().len(),
        peak_power = %metrics.peak_power,
        "loaded the profile"
    );
    println!("{}", build_metrics_table(&metrics));
    println!("{}", build_cells_table(cells.as_ref()));

    let outcome = Scenario::builder()
        .profile(&profile)
        .cells(cells.as_ref())
        .strategy(strategy)
        .target_voltage(args.sizing.target_voltage)
        .depth_of_discharge(args.sizing.depth_of_discharge)
        .initial_soc(args.sizing.initial_soc)
        .charging_power(args.sizing.charging_power)
        .cycles_per_year(args.sizing.cycles_per_year)
        .lifetime_years(args.sizing.lifetime_years)
        .run(&mut LoggingProgress::new(should_terminate))
        .context("failed to size the system")?;

    if let Some(cost_curve) = &outcome.cost_curve {
        println!("{}", build_cost_curve_table(cost_curve));
    }
    if args.trajectories {
        println!("{}", build_trajectory_table(&outcome.simulation));
    }
    println!("{}", build_packs_table(&outcome));
    if !outcome.advisories.is_empty() {
        println!("{}", build_advisories_table(&outcome.advisories));
    }
    info!(
        total_cost = %outcome.total_cost(),
        total_energy = %outcome.total_energy(),
        optimum = ?outcome.optimum,
        "sized"
    );
    Ok(())
}

/// Logs every ten percent and turns a termination signal into cancellation.
struct LoggingProgress {
    should_terminate: Arc<AtomicBool>,
    next_milestone: Percentage,
}

impl LoggingProgress {
    const MILESTONE: Percentage = Percentage(10.0);

    const fn new(should_terminate: Arc<AtomicBool>) -> Self {
        Self { should_terminate, next_milestone: Percentage::ZERO }
    }
}

impl Progress for LoggingProgress {
    fn report(&mut self, percent: Percentage, label: &str) {
        if percent >= self.next_milestone {
            info!(%percent, "{label}");
            while self.next_milestone <= percent {
                self.next_milestone += Self::MILESTONE;
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.should_terminate.load(Ordering::Relaxed)
    }
}
