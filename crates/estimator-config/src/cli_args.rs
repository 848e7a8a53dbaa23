use std::path::PathBuf;

/// Command-line overrides, highest precedence.
///
/// `debug` is a flag: `false` means "not given on the command line", so it
/// never switches debug mode off once the environment or file turned it on.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub document: Option<String>,
    pub output: Option<String>,
    pub xlsx: Option<String>,
    pub model: Option<String>,
    pub provider: Option<String>,
    pub debug: bool,
    pub debug_dir: Option<String>,
    pub verbose: Option<bool>,
    /// Saved response for the `replay` provider.
    pub replay_file: Option<String>,
}
