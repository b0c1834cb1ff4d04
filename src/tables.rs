use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        advisory::Advisory,
        cell::CellSpec,
        optimizer::CostCurve,
        pipeline::{Outcome, PackReport},
        profile::ProfileMetrics,
        simulator::{Simulation, SubsystemState},
        subsystem::{Hybrid, Subsystem},
    },
    quantity::{ratios::Percentage, time::Hours},
};

/// Number of evenly spaced cost curve points to show.
const N_COST_CURVE_ROWS: usize = 11;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn right(content: impl ToString) -> Cell {
    Cell::new(content).set_alignment(CellAlignment::Right)
}

fn dash() -> Cell {
    Cell::new("—").set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim)
}

pub fn build_metrics_table(metrics: &ProfileMetrics) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Required energy", "Peak power", "Mean power", "PAPR"]);
    table.add_row(vec![
        right(metrics.required_energy),
        right(metrics.peak_power),
        right(metrics.mean_power),
        metrics.peak_to_average_ratio.map_or_else(dash, |ratio| right(format!("{ratio:.2} dB"))),
    ]);
    table
}

pub fn build_cells_table(cells: Hybrid<&CellSpec>) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Cell"),
        Cell::new(Subsystem::HighEnergy),
        Cell::new(Subsystem::HighPower),
    ]);
    let mut add_row = |parameter: &str, value: &dyn Fn(&CellSpec) -> String| {
        table.add_row(vec![
            Cell::new(parameter).add_attribute(Attribute::Dim),
            right(value(cells.high_energy)),
            right(value(cells.high_power)),
        ]);
    };
    add_row("Name", &|cell| cell.name.clone());
    add_row("Rated capacity", &|cell| cell.capacity.to_string());
    add_row("Nominal voltage", &|cell| cell.nominal_voltage.to_string());
    add_row("Energy", &|cell| format!("{:.2}", cell.energy()));
    add_row("Max C-rates", &|cell| {
        format!("{:.2} / {:.2}", cell.max_discharge_rate, cell.max_charge_rate)
    });
    add_row("Cost density", &|cell| format!("{:.2} €/kWh", cell.cost_density()));
    add_row("Weight density", &|cell| format!("{:.2} kg/kWh", cell.weight_density()));
    table
}

pub fn build_catalogue_table(cells: &[(&str, CellSpec)]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Preset", "Name", "Capacity", "Voltage", "Energy", "C-rates", "Cost", "€/kWh", "kg/kWh",
    ]);
    for (preset, cell) in cells {
        table.add_row(vec![
            Cell::new(preset).fg(Color::Cyan),
            Cell::new(&cell.name),
            right(cell.capacity),
            right(cell.nominal_voltage),
            right(format!("{:.2}", cell.energy())),
            right(format!("{:.2} / {:.2}", cell.max_discharge_rate, cell.max_charge_rate)),
            right(cell.cost),
            right(format!("{:.2}", cell.cost_density())),
            right(format!("{:.2}", cell.weight_density())),
        ]);
    }
    table
}

pub fn build_packs_table(outcome: &Outcome) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Pack"),
        Cell::new(Subsystem::HighEnergy),
        Cell::new(Subsystem::HighPower),
        Cell::new("Total"),
    ]);

    let reports = outcome.packs;
    let mut add_row = |parameter: &str,
                       value: &dyn Fn(&PackReport) -> Option<String>,
                       total: Cell| {
        let cell = |report: &PackReport| value(report).map_or_else(dash, right);
        table.add_row(vec![
            Cell::new(parameter).add_attribute(Attribute::Dim),
            cell(&reports.high_energy),
            cell(&reports.high_power),
            total,
        ]);
    };
    add_row("Cells in series", &|report| Some(report.pack.series.to_string()), dash());
    add_row("Cells in parallel", &|report| Some(report.pack.parallel.to_string()), dash());
    add_row(
        "Cells",
        &|report| Some(report.pack.n_cells().to_string()),
        right(reports.map(|report| report.pack.n_cells()).sum()),
    );
    add_row(
        "Energy",
        &|report| Some(report.pack.energy.to_string()),
        right(outcome.total_energy()),
    );
    add_row("Nominal voltage", &|report| Some(report.pack.nominal_voltage.to_string()), dash());
    add_row(
        "Minimum voltage",
        &|report| report.envelope.map(|envelope| envelope.min_voltage.to_string()),
        dash(),
    );
    add_row(
        "Maximum voltage",
        &|report| report.envelope.map(|envelope| envelope.max_voltage.to_string()),
        dash(),
    );
    add_row(
        "Maximum discharge current",
        &|report| report.envelope.map(|envelope| envelope.max_discharge_current.to_string()),
        dash(),
    );
    add_row(
        "Maximum charge current",
        &|report| report.envelope.map(|envelope| envelope.max_charge_current.to_string()),
        dash(),
    );
    add_row(
        "Minimum state of charge",
        &|report| report.envelope.map(|envelope| envelope.min_state_of_charge.to_string()),
        dash(),
    );
    add_row(
        "Weight",
        &|report| Some(report.pack.weight.to_string()),
        right(reports.map(|report| report.pack.weight).sum()),
    );
    add_row(
        "End-of-life health",
        &|report| report.end_of_life_state_of_health.map(|health| health.to_string()),
        dash(),
    );
    add_row(
        "Cost",
        &|report| Some(report.pack.cost.to_string()),
        right(outcome.total_cost()).add_attribute(Attribute::Bold),
    );
    table
}

/// Evenly spaced points of the cost curve, with the minimum highlighted.
pub fn build_cost_curve_table(cost_curve: &CostCurve) -> Table {
    let minimum = cost_curve.minimum();
    let step = cost_curve.points.len().div_ceil(N_COST_CURVE_ROWS - 1).max(1);

    let mut table = new_table();
    table.set_header(vec![
        format!("{} ({})", cost_curve.sweep.parameter_name(), cost_curve.sweep.parameter_unit()),
        "Total cost".to_string(),
    ]);
    let mut points = cost_curve.points.iter().copied().step_by(step).collect::<Vec<_>>();
    if let Some(last) = cost_curve.points.last()
        && points.last() != Some(last)
    {
        points.push(*last);
    }
    if let Some(minimum) = minimum
        && !points.contains(&minimum)
    {
        points.push(minimum);
        points.sort_by(|(lhs, _), (rhs, _)| lhs.total_cmp(rhs));
    }
    for (parameter, cost) in points {
        let is_minimum = minimum == Some((parameter, cost));
        table.add_row(vec![
            right(parameter),
            right(cost).fg(if is_minimum { Color::Green } else { Color::Reset }),
        ]);
    }
    table
}

pub fn build_trajectory_table(simulation: &Simulation) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Time", "Power", "HE power", "HP power", "HE SoC", "HP SoC", "HE voltage", "HP voltage",
        "HE current", "HP current", "Current",
    ]);
    for step in &simulation.steps {
        let states = step.states;
        let state_cells = |field: fn(&SubsystemState) -> String| {
            states.map(|state| state.as_ref().map(field).map_or_else(dash, right))
        };
        let soc = states.map(|state| state.map(|state| state.state_of_charge));
        let [soc_high_energy, soc_high_power] =
            [soc.high_energy, soc.high_power].map(|soc| soc.map_or_else(dash, soc_cell));
        let voltages = state_cells(|state| state.voltage.to_string());
        let currents = state_cells(|state| state.current.to_string());
        table.add_row(vec![
            right(format!("{:.3}", Hours::from(step.time))).add_attribute(Attribute::Dim),
            right(step.power.total),
            right(step.power.shares.high_energy),
            right(step.power.shares.high_power),
            soc_high_energy,
            soc_high_power,
            voltages.high_energy,
            voltages.high_power,
            currents.high_energy,
            currents.high_power,
            right(step.current),
        ]);
    }
    table
}

fn soc_cell(state_of_charge: Percentage) -> Cell {
    right(state_of_charge).fg(
        if state_of_charge < Percentage::ZERO || state_of_charge > Percentage(100.0) {
            Color::Red
        } else {
            Color::Reset
        },
    )
}

pub fn build_advisories_table(advisories: &[Advisory]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Advisory"]);
    for advisory in advisories {
        table.add_row(vec![Cell::new(advisory).fg(Color::DarkYellow)]);
    }
    table
}
