use std::path::PathBuf;

use clap::Parser;

/// Clone repositories listed in a YAML file and set them up.
#[derive(Parser, Debug)]
#[command(
    name = "clone-repos",
    about = "Clone repositories from a YAML config and run their setup steps",
    version
)]
pub struct Cli {
    /// Directory repositories are cloned into
    #[arg(long = "base-repos", env = "REPOS", value_name = "DIR")]
    pub base_repos: PathBuf,

    /// Print the resolved plans as JSON instead of running them
    #[arg(short, long, visible_alias = "dry-run")]
    pub parse: bool,

    /// Pass --break-system-packages to pip
    #[arg(short = 'B', long)]
    pub break_system_packages: bool,

    /// Python interpreter used to run pip
    #[arg(
        long,
        env = "CLONE_REPOS_PYTHON",
        default_value = "python3",
        value_name = "PATH"
    )]
    pub python: String,

    /// Stop every remaining repository when a package install fails
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file (default: $XDG_CONFIG_DIR/clone-repos.yaml)
    #[arg(value_name = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,
}

impl Cli {
    /// Name of the log file this invocation writes to.
    #[must_use]
    pub const fn command_name(&self) -> &'static str {
        if self.parse { "parse" } else { "clone" }
    }
}
