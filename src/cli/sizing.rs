use clap::Parser;

use crate::quantity::{electric::Volts, power::Kilowatts, ratios::Percentage};

#[derive(Copy, Clone, Parser)]
pub struct SizingArgs {
    /// Target bus voltage of both packs.
    #[clap(long = "target-voltage", env = "HBESS_TARGET_VOLTAGE", default_value = "1000")]
    pub target_voltage: Volts,

    /// Usable share of the pack energy.
    #[clap(long = "depth-of-discharge", env = "HBESS_DEPTH_OF_DISCHARGE", default_value = "80")]
    pub depth_of_discharge: Percentage,

    /// State of charge at the start of the profile.
    #[clap(long = "initial-soc", env = "HBESS_INITIAL_SOC", default_value = "90")]
    pub initial_soc: Percentage,

    /// Power of the charging plateau appended to the profile.
    #[clap(long = "charging-power-kilowatts", env = "HBESS_CHARGING_POWER", default_value = "2000")]
    pub charging_power: Kilowatts,

    #[clap(long = "cycles-per-year", env = "HBESS_CYCLES_PER_YEAR", default_value = "365")]
    pub cycles_per_year: f64,

    /// Expected lifetime in years.
    #[clap(long = "lifetime", env = "HBESS_LIFETIME", default_value = "20")]
    pub lifetime_years: f64,
}
