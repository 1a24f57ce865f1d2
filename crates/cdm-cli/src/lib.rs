//! Command-line pipeline over the cdm crates.

pub mod cli;
pub mod commands;
pub mod logging;
