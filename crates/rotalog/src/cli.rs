//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use rotalog::constants::LOOKUP_PREFIX;
use rotalog::ConfigLoader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rotalog")]
#[command(version, about = "Rotating file logging driven by conf/log.yml")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Do not echo log lines to stderr (the log file still gets them)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Base directory holding conf/log.yml (defaults to the working directory)
    #[arg(short, long, global = true, env = "ROTALOG_DIR")]
    pub dir: Option<PathBuf>,

    /// Explicit config file, overrides --dir
    #[arg(short, long, global = true, env = "ROTALOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Config section the settings are read from
    #[arg(long, global = true, default_value = LOOKUP_PREFIX)]
    pub prefix: String,
}

impl ConfigArgs {
    pub fn loader(&self) -> anyhow::Result<ConfigLoader> {
        let loader = match (&self.config, &self.dir) {
            (Some(file), _) => ConfigLoader::new(file),
            (None, Some(dir)) => ConfigLoader::in_dir(dir),
            (None, None) => ConfigLoader::from_working_dir()?,
        };
        Ok(loader)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure logging and write one line at every severity
    Run {
        /// Keep running and follow config changes until Ctrl-C
        #[arg(short, long)]
        follow: bool,
    },

    /// Print the effective rotation settings
    Settings,
}
