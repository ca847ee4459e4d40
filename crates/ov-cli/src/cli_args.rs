use clap::{Args, Parser, Subcommand};
use ov_core::DEFAULT_MAX_DEPTH;

#[derive(Debug, Parser)]
#[command(name = "ov-cli")]
#[command(about = "Inspect and validate ode project packages")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Inspect(InspectArgs),
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub(crate) struct InspectArgs {
    /// Package directory, `.zip`/`.elp` archive, or a manifest `.xml` file.
    #[arg(long = "package")]
    pub(crate) package: String,
    /// Manifest path inside the package; skips discovery.
    #[arg(long = "manifest")]
    pub(crate) manifest: Option<String>,
    #[arg(long = "max-depth", default_value_t = DEFAULT_MAX_DEPTH)]
    pub(crate) max_depth: usize,
    #[arg(long = "json")]
    pub(crate) json: bool,
}

#[derive(Debug, Args)]
pub(crate) struct ValidateArgs {
    #[arg(long = "package")]
    pub(crate) package: String,
    #[arg(long = "max-depth", default_value_t = DEFAULT_MAX_DEPTH)]
    pub(crate) max_depth: usize,
}
