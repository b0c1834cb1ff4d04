pub mod advisory;
pub mod cell;
pub mod charging;
pub mod curve;
pub mod error;
pub mod integrate;
pub mod optimizer;
pub mod pack;
pub mod pipeline;
pub mod profile;
pub mod progress;
pub mod sharing;
pub mod simulator;
pub mod subsystem;
