#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod catalogue;
mod cli;
mod core;
mod loader;
mod prelude;
mod quantity;
mod tables;

use clap::{Parser, crate_version};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, Command, cells, size},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Size(args) => size(&args)?,
        Command::Cells => cells()?,
    }

    info!("done!");
    Ok(())
}
