use std::{f64::consts::TAU, path::Path};

use clap::ValueEnum;

use crate::{
    core::{cell::CellSpec, profile::LoadProfile},
    loader,
    prelude::*,
    quantity::{
        cost::Cost,
        electric::{AmpereHours, Volts},
        mass::Kilograms,
    },
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CellPreset {
    /// Samsung SDI 94 Ah prismatic NMC cell.
    #[value(name = "nmc-samsung-94ah")]
    NmcSamsung94Ah,

    /// Toshiba SCiB 23 Ah prismatic LTO cell.
    #[value(name = "lto-toshiba-23ah")]
    LtoToshiba23Ah,

    /// Read the cell from a CSV file.
    Custom,
}

impl CellPreset {
    pub const BUILT_IN: [Self; 2] = [Self::NmcSamsung94Ah, Self::LtoToshiba23Ah];

    /// Command-line name of the preset.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::NmcSamsung94Ah => "nmc-samsung-94ah",
            Self::LtoToshiba23Ah => "lto-toshiba-23ah",
            Self::Custom => "custom",
        }
    }

    /// Resolve the preset, falling back to the default cell when a custom cell is unusable.
    pub fn resolve(self, file: Option<&Path>) -> Result<CellSpec> {
        match (self, file) {
            (Self::NmcSamsung94Ah, _) => nmc_samsung_94ah(),
            (Self::LtoToshiba23Ah, _) => lto_toshiba_23ah(),
            (Self::Custom, Some(path)) => match loader::cell::read_path(path) {
                Ok(cell) => Ok(cell),
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        "the cell file is not in the correct format: {error:#}"
                    );
                    default_cell()
                }
            },
            (Self::Custom, None) => {
                warn!("no custom cell file is given, using the default cell");
                default_cell()
            }
        }
    }
}

/// Substitute for a malformed or missing cell file.
pub fn default_cell() -> Result<CellSpec> {
    nmc_samsung_94ah()
}

fn nmc_samsung_94ah() -> Result<CellSpec> {
    let cell = CellSpec::builder()
        .name("NMC Samsung 94Ah")
        .capacity(AmpereHours(94.0))
        .nominal_voltage(Volts(3.68))
        .max_discharge_rate(2.0)
        .max_charge_rate(1.0)
        .cost(Cost(52.0))
        .weight(Kilograms(2.1))
        .open_circuit_voltage(volts([
            (0.0, 3.40),
            (0.1, 3.55),
            (0.2, 3.62),
            (0.3, 3.66),
            (0.4, 3.70),
            (0.5, 3.75),
            (0.6, 3.82),
            (0.7, 3.90),
            (0.8, 3.98),
            (0.9, 4.07),
            (1.0, 4.17),
        ]))
        .capacity_fade(vec![
            (0.0, 1.0),
            (1000.0, 0.93),
            (2000.0, 0.87),
            (3000.0, 0.82),
            (4000.0, 0.8),
        ])
        .build()?;
    Ok(cell)
}

fn lto_toshiba_23ah() -> Result<CellSpec> {
    let cell = CellSpec::builder()
        .name("LTO Toshiba 23Ah")
        .capacity(AmpereHours(23.0))
        .nominal_voltage(Volts(2.3))
        .max_discharge_rate(7.0)
        .max_charge_rate(7.0)
        .cost(Cost(27.0))
        .weight(Kilograms(0.55))
        .open_circuit_voltage(volts([
            (0.0, 1.90),
            (0.1, 2.15),
            (0.2, 2.22),
            (0.3, 2.26),
            (0.4, 2.29),
            (0.5, 2.31),
            (0.6, 2.34),
            (0.7, 2.37),
            (0.8, 2.41),
            (0.9, 2.47),
            (1.0, 2.60),
        ]))
        .capacity_fade(vec![(0.0, 1.0), (5000.0, 0.95), (10000.0, 0.9), (20000.0, 0.85)])
        .build()?;
    Ok(cell)
}

fn volts<const N: usize>(points: [(f64, f64); N]) -> Vec<(f64, Volts)> {
    points.into_iter().map(|(soc, voltage)| (soc, Volts(voltage))).collect()
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ProfilePreset {
    /// Two hours of a sinusoidal demand around 500 kW.
    SineWave,

    /// Read the profile from a CSV file.
    Custom,
}

impl ProfilePreset {
    /// Resolve the preset, falling back to the flat zero profile when a custom profile is unusable.
    #[must_use]
    pub fn resolve(self, file: Option<&Path>) -> LoadProfile {
        match (self, file) {
            (Self::SineWave, _) => sine_wave(),
            (Self::Custom, Some(path)) => match loader::profile::read_path(path) {
                Ok(profile) => profile,
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        "the load profile is not in the correct format: {error:#}"
                    );
                    LoadProfile::flat_zero()
                }
            },
            (Self::Custom, None) => {
                warn!("no custom load profile is given, using a flat zero profile");
                LoadProfile::flat_zero()
            }
        }
    }
}

/// Demand oscillating between 200 kW and 800 kW with a 24-minute period, sampled every minute.
fn sine_wave() -> LoadProfile {
    const DURATION: u32 = 7200;
    const STEP: usize = 60;
    const PERIOD: f64 = 1440.0;

    LoadProfile::try_from_samples((0..=DURATION).step_by(STEP).map(|time| {
        let time = f64::from(time);
        (time, 500_000.0 + 300_000.0 * (TAU * time / PERIOD).sin())
    }))
    .unwrap_or_else(|error| {
        error!("failed to synthesise the sine wave: {error:#}");
        LoadProfile::flat_zero()
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_built_in_cells() {
        for preset in CellPreset::BUILT_IN {
            let cell = preset.resolve(None).unwrap();
            assert!(cell.energy().0 > 0.0, "{preset:?}");
            assert!(cell.state_of_health(7300.0).is_some());
        }
    }

    #[test]
    fn test_keys_match_the_command_line() {
        for preset in CellPreset::value_variants() {
            let value = preset.to_possible_value().unwrap();
            assert_eq!(value.get_name(), preset.key());
        }
    }

    #[test]
    fn test_missing_custom_cell_falls_back() {
        let cell = CellPreset::Custom.resolve(None).unwrap();
        assert_eq!(cell.name, "NMC Samsung 94Ah");
    }

    #[test]
    fn test_unreadable_custom_cell_falls_back() {
        let cell = CellPreset::Custom.resolve(Some(Path::new("/nonexistent/cell.csv"))).unwrap();
        assert_eq!(cell.name, "NMC Samsung 94Ah");
    }

    #[test]
    fn test_sine_wave() {
        let profile = ProfilePreset::SineWave.resolve(None);
        assert_eq!(profile.points().len(), 121);
        let metrics = profile.metrics();
        assert_abs_diff_eq!(metrics.peak_power.0, 800.0, epsilon = 1e-6);
        assert_abs_diff_eq!(metrics.required_energy.0, 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_custom_profile_falls_back() {
        let profile = ProfilePreset::Custom.resolve(None);
        assert_eq!(profile.points(), LoadProfile::flat_zero().points());
    }
}
