//! Command-line interface for estimator
//!
//! - `args`: clap definitions
//! - `run`: entry point and dispatch
//! - `commands`: command implementations and the summary block

pub mod args;
mod commands;
mod run;

pub use args::{Cli, Commands, OutputArgs, build_cli};
pub use run::run;
