//! Cell and load profile selection.

use std::path::PathBuf;

use clap::Parser;

use crate::{
    catalogue::{CellPreset, ProfilePreset},
    core::{cell::CellSpec, profile::LoadProfile, subsystem::Hybrid},
    prelude::*,
};

#[derive(Parser)]
pub struct InputArgs {
    /// High-energy (HE) cell.
    #[clap(long = "he-cell", env = "HBESS_HE_CELL", default_value = "nmc-samsung-94ah")]
    pub high_energy_cell: CellPreset,

    /// High-power (HP) cell.
    #[clap(long = "hp-cell", env = "HBESS_HP_CELL", default_value = "lto-toshiba-23ah")]
    pub high_power_cell: CellPreset,

    /// CSV file of the custom high-energy cell.
    #[clap(long = "he-cell-file", env = "HBESS_HE_CELL_FILE")]
    pub high_energy_cell_file: Option<PathBuf>,

    /// CSV file of the custom high-power cell.
    #[clap(long = "hp-cell-file", env = "HBESS_HP_CELL_FILE")]
    pub high_power_cell_file: Option<PathBuf>,

    #[clap(long = "load-profile", env = "HBESS_LOAD_PROFILE", default_value = "sine-wave")]
    pub load_profile: ProfilePreset,

    /// CSV file of the custom load profile with `time (s)` and `power (W)` columns.
    #[clap(long = "load-profile-file", env = "HBESS_LOAD_PROFILE_FILE")]
    pub load_profile_file: Option<PathBuf>,
}

impl InputArgs {
    pub fn cells(&self) -> Result<Hybrid<CellSpec>> {
        Ok(Hybrid::new(
            self.high_energy_cell.resolve(self.high_energy_cell_file.as_deref())?,
            self.high_power_cell.resolve(self.high_power_cell_file.as_deref())?,
        ))
    }

    pub fn load_profile(&self) -> LoadProfile {
        self.load_profile.resolve(self.load_profile_file.as_deref())
    }
}
