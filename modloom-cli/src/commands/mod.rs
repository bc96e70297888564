use clap::Subcommand;
use std::path::PathBuf;

pub mod inspect;
pub mod plan;

/// Host API version assumed when `--api-version` is not given.
const DEFAULT_API_VERSION: &str = "4.0.0";

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a mods folder into an ordered load plan
    Plan {
        /// Folder containing the installed mods
        root: PathBuf,

        /// Host API version to validate against
        #[arg(long, default_value = DEFAULT_API_VERSION)]
        api_version: String,

        /// Load compatibility records from a JSON file instead of the bundled set
        #[arg(long)]
        compat_db: Option<PathBuf>,

        /// Only print the summary line
        #[arg(short, long)]
        quiet: bool,
    },

    /// Parse and print a single mod folder's manifest
    Inspect {
        /// The mod folder
        path: PathBuf,
    },
}

impl Commands {
    pub fn execute(self) -> anyhow::Result<()> {
        match self {
            Commands::Plan {
                root,
                api_version,
                compat_db,
                quiet,
            } => plan::execute(&root, &api_version, compat_db.as_deref(), quiet),
            Commands::Inspect { path } => inspect::execute(&path),
        }
    }
}
