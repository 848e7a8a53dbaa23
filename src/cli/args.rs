//! CLI argument definitions and parsing structures
//!
//! Global options override the environment and `estimator.toml`; each
//! subcommand adds its own inputs and outputs.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// estimator - turns a project specification into an effort estimation
#[derive(Parser, Debug)]
#[command(name = "estimator")]
#[command(about = "Estimate project effort from a specification document using an LLM")]
#[command(long_about = r#"
estimator reads a project specification (PDF, DOCX or plain text), asks a
language model for a phase-by-phase effort estimation, recovers a valid
estimation from whatever the model answered, and writes it as JSON and XLSX.

EXAMPLES:
  # Estimate the configured document (DOCUMENT_PATH or sampleproject.pdf)
  estimator estimate

  # Estimate a specific document with debug artifacts
  estimator estimate specs/inventory.docx --debug --debug-dir ./debug

  # Re-run recovery on a saved model response, without calling the model
  estimator recover ./debug/response.txt

  # Show the effective configuration and where each value came from
  estimator config

CONFIGURATION:
  Precedence: CLI flags > environment variables > estimator.toml > defaults
  estimator.toml is read from the current directory or $ESTIMATOR_HOME.
  The API key is read from GROQ_API_KEY (or ANTHROPIC_API_KEY); a .env file
  in the current directory is loaded at startup.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model identifier sent to the provider
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// LLM provider: groq, anthropic or replay
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run; `estimate` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output locations shared by `estimate` and `recover`.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Estimation JSON output path
    #[arg(long, short)]
    pub output: Option<String>,

    /// Spreadsheet output path
    #[arg(long)]
    pub xlsx: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the document, ask the model, and write the estimation
    ///
    /// EXAMPLES:
    ///   estimator estimate
    ///   estimator estimate spec.pdf --output estimate.json --xlsx estimate.xlsx
    ///   estimator estimate spec.pdf --provider replay --replay response.txt
    Estimate {
        /// Specification document (.pdf, .docx, .doc, .txt, .md)
        document: Option<String>,

        #[command(flatten)]
        outputs: OutputArgs,

        /// Persist prompt, raw responses and recovery intermediates
        #[arg(long)]
        debug: bool,

        /// Directory for debug artifacts
        #[arg(long)]
        debug_dir: Option<String>,

        /// Saved response answered by the replay provider
        #[arg(long, value_name = "FILE")]
        replay: Option<String>,
    },

    /// Recover an estimation from a saved model response
    ///
    /// Runs normalization, repair, validation and metrics on the file and
    /// writes the reports. The model is not called.
    Recover {
        /// Raw model response (for example a debug-mode response.txt)
        response_file: String,

        #[command(flatten)]
        outputs: OutputArgs,
    },

    /// Print the effective configuration with value sources
    Config,
}

impl Commands {
    /// Name used in error reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Estimate { .. } => "estimate",
            Self::Recover { .. } => "recover",
            Self::Config => "config",
        }
    }
}

/// Build the clap command (for completions and tests).
#[must_use]
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
