//! Configuration for estimator
//!
//! Hierarchical configuration with precedence CLI > environment > file >
//! defaults, and per-key source attribution for `estimator config`.

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use discovery::{CONFIG_FILE_NAME, HOME_ENV};
pub use estimator_utils::types::ConfigSource;
pub use model::*;
pub use validation::KNOWN_PROVIDERS;
