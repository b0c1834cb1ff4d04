use std::{fs::File, io::Read, path::Path};

use serde::Deserialize;

use crate::{
    core::cell::CellSpec,
    prelude::*,
    quantity::{
        cost::Cost,
        electric::{AmpereHours, Volts},
        mass::Kilograms,
    },
};

const HEADERS: [&str; 3] = ["parameter", "value", "unit"];
const N_ROWS: usize = 12;

mod row {
    pub const NAME: usize = 0;
    pub const CAPACITY: usize = 2;
    pub const NOMINAL_VOLTAGE: usize = 3;
    pub const WEIGHT: usize = 4;
    pub const COST: usize = 5;
    pub const MAX_DISCHARGE: usize = 6;
    pub const MAX_CHARGE: usize = 7;
    pub const OPEN_CIRCUIT_VOLTAGE: usize = 8;
    pub const STATE_OF_CHARGE: usize = 9;
    pub const STATE_OF_HEALTH: usize = 10;
    pub const N_CYCLES: usize = 11;
}

#[derive(Deserialize)]
struct Row {
    parameter: String,
    value: String,
    unit: String,
}

pub fn read_path(path: &Path) -> Result<CellSpec> {
    let file = File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
    read(file)
}

/// Read a cell from the 12-row `parameter,value,unit` table.
///
/// The current rows accept either a C-rate or, with the unit `A`, an absolute current.
#[instrument(skip_all)]
pub fn read(reader: impl Read) -> Result<CellSpec> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().context("failed to read the header")?;
    ensure!(headers.iter().eq(HEADERS), "expected the header `{}`", HEADERS.join(","));
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<Row>, _>>()
        .context("failed to read the cell parameters")?;
    ensure!(rows.len() == N_ROWS, "expected {N_ROWS} parameters, got {}", rows.len());

    let capacity = AmpereHours(number(&rows[row::CAPACITY])?);
    let open_circuit_voltage = pairs(&rows[row::STATE_OF_CHARGE], &rows[row::OPEN_CIRCUIT_VOLTAGE])?
        .into_iter()
        .map(|(soc, voltage)| (soc, Volts(voltage)))
        .collect();
    let capacity_fade = pairs(&rows[row::N_CYCLES], &rows[row::STATE_OF_HEALTH])?;

    let cell = CellSpec::builder()
        .name(rows[row::NAME].value.trim())
        .capacity(capacity)
        .nominal_voltage(Volts(number(&rows[row::NOMINAL_VOLTAGE])?))
        .weight(Kilograms(number(&rows[row::WEIGHT])?))
        .cost(Cost(number(&rows[row::COST])?))
        .max_discharge_rate(rate(&rows[row::MAX_DISCHARGE], capacity)?)
        .max_charge_rate(rate(&rows[row::MAX_CHARGE], capacity)?)
        .open_circuit_voltage(open_circuit_voltage)
        .capacity_fade(capacity_fade)
        .build()?;
    debug!(name = %cell.name, energy = %cell.energy(), "read the cell");
    Ok(cell)
}

fn number(row: &Row) -> Result<f64> {
    row.value.trim().parse().with_context(|| format!("`{}` is not a number", row.parameter))
}

fn list(row: &Row) -> Result<Vec<f64>> {
    serde_json::from_str(row.value.trim())
        .with_context(|| format!("`{}` is not a list of numbers", row.parameter))
}

/// C-rate from either a C-rate or a current in amperes.
fn rate(row: &Row, capacity: AmpereHours) -> Result<f64> {
    let value = number(row)?;
    Ok(if row.unit.trim().eq_ignore_ascii_case("A") { value / capacity.0 } else { value })
}

/// Zip two list rows into points.
fn pairs(xs: &Row, ys: &Row) -> Result<Vec<(f64, f64)>> {
    let (xs_values, ys_values) = (list(xs)?, list(ys)?);
    ensure!(
        xs_values.len() == ys_values.len(),
        "`{}` and `{}` differ in length",
        xs.parameter,
        ys.parameter,
    );
    Ok(xs_values.into_iter().zip(ys_values).collect())
}
