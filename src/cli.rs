mod cells;
mod input;
mod size;
mod sizing;
mod strategy;

use clap::{Parser, Subcommand};

pub use self::{cells::cells, size::size};
use crate::cli::size::SizeArgs;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Share the load between the subsystems, size both packs and simulate them.
    #[clap(name = "size")]
    Size(Box<SizeArgs>),

    /// List the built-in cells.
    #[clap(name = "cells")]
    Cells,
}
