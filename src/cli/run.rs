//! CLI entry point and dispatch logic
//!
//! `run()` parses arguments, discovers configuration, dispatches the command
//! and prints every error. main.rs only maps the returned exit code.

use camino::Utf8PathBuf;
use clap::Parser;

use super::args::{Cli, Commands, OutputArgs};
use super::commands;

use crate::{CliArgs, Config, EstimatorError, ExitCode};
use estimator_utils::logging::init_tracing;
use estimator_utils::redaction::redact_secrets;

/// Fold global and subcommand flags into configuration overrides.
pub(crate) fn cli_args_for(cli: &Cli) -> CliArgs {
    let mut args = CliArgs {
        config_path: cli.config.clone(),
        model: cli.model.clone(),
        provider: cli.provider.clone(),
        verbose: Some(cli.verbose),
        ..CliArgs::default()
    };

    let apply_outputs = |args: &mut CliArgs, outputs: &OutputArgs| {
        args.output = outputs.output.clone();
        args.xlsx = outputs.xlsx.clone();
    };

    match &cli.command {
        Some(Commands::Estimate {
            document,
            outputs,
            debug,
            debug_dir,
            replay,
        }) => {
            args.document = document.clone();
            apply_outputs(&mut args, outputs);
            args.debug = *debug;
            args.debug_dir = debug_dir.clone();
            args.replay_file = replay.clone();
            if replay.is_some() && args.provider.is_none() {
                args.provider = Some("replay".to_string());
            }
        }
        Some(Commands::Recover { outputs, .. }) => apply_outputs(&mut args, outputs),
        Some(Commands::Config) | None => {}
    }
    args
}

/// Main CLI execution function.
///
/// Handles ALL output including errors and returns the exit code to use on
/// failure.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    // A second initialization (embedding, tests) is harmless.
    let _ = init_tracing(cli.verbose);

    let cli_args = cli_args_for(&cli);
    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            let err = EstimatorError::from(err);
            eprintln!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };

    let operation = cli.command.as_ref().map_or("estimate", Commands::name);

    let result = match &cli.command {
        Some(Commands::Config) => commands::execute_config_command(&config),
        Some(Commands::Recover { response_file, .. }) => {
            commands::execute_recover_command(&config, &Utf8PathBuf::from(response_file))
        }
        Some(Commands::Estimate { .. }) | None => {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("✗ Failed to create async runtime: {e}");
                    return Err(ExitCode::INTERNAL);
                }
            };
            rt.block_on(commands::execute_estimate_command(&config))
        }
    };

    if let Err(error) = result {
        if let Some(err) = error.downcast_ref::<EstimatorError>() {
            eprintln!("{}", err.display_for_user());
            if config.debug() && err.stage().is_recovery() {
                eprintln!(
                    "The text that failed at the {} stage was saved under {}",
                    err.stage(),
                    config.debug_dir()
                );
            }
            return Err(err.to_exit_code());
        }

        eprintln!(
            "✗ {operation} failed: {}",
            redact_secrets(&format!("{error:#}"))
        );
        return Err(ExitCode::INTERNAL);
    }

    Ok(())
}
