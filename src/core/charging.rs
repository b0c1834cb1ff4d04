use crate::{
    core::{
        error::{Error, Result},
        profile::{Point, Split, SplitProfile},
    },
    prelude::*,
    quantity::{
        energy::KilowattHours,
        power::{Kilowatts, Watts},
        time::{Hours, Seconds},
    },
};

/// Append a constant-power charging plateau that returns the net discharged energy.
///
/// Both subsystems are charged in proportion to their share of the net energy. The plateau
/// starts at the last timestamp, so the resulting time axis is non-decreasing.
#[instrument(skip_all, fields(charging_power = %charging_power))]
pub fn append_charging(
    mut profile: SplitProfile,
    charging_power: Kilowatts,
) -> Result<SplitProfile> {
    if !(charging_power.is_finite() && charging_power > Kilowatts::ZERO) {
        return Err(Error::invalid_parameter(
            "charging_power",
            format!("must be positive, got {charging_power}"),
        ));
    }
    let (Some(final_energy), Some(last)) =
        (profile.cumulative_energy().last().copied(), profile.last().copied())
    else {
        return Err(Error::Degenerate("the profile is empty"));
    };
    if !(final_energy.total.is_finite() && final_energy.total > KilowattHours::ZERO) {
        return Err(Error::Degenerate("the profile does not discharge any net energy"));
    }

    let total = -Watts::from(charging_power);
    let shares = final_energy.shares.map(|energy| total * (energy / final_energy.total));
    let duration = Seconds::from(Hours(final_energy.total / (charging_power * Hours(1.0))));
    debug!(%duration, ?shares, "charging");

    let value = Split { total, shares };
    profile.extend([Point::new(last.time, value), Point::new(last.time + duration, value)]);
    Ok(profile)
}
