//! Run command implementation

use anyhow::Result;
use colored::Colorize;
use rotalog::{install_global_subscriber, LogInitializer};
use tracing::{debug, error, info, warn};

use crate::cli::ConfigArgs;

pub async fn execute(args: &ConfigArgs, follow: bool, quiet: bool) -> Result<()> {
    let control = install_global_subscriber(!quiet)?;

    let mut handle = LogInitializer::new(args.loader()?, control)
        .with_lookup_prefix(&args.prefix)
        .watch(follow)
        .init()?;

    debug!("debug line");
    info!("info line");
    warn!("warn line");
    error!("error line");
    error!(severity = "fatal", "fatal line");
    error!(severity = "panic", "panic line");

    let settings = handle.settings();
    println!(
        "{} Logging to {} at {}",
        "✓".green(),
        settings
            .log_dir
            .join(format!("{}.log", settings.base_filename))
            .display()
            .to_string()
            .bold(),
        settings.threshold().to_string().cyan()
    );

    if follow && handle.is_watching() {
        println!(
            "Following {} (Ctrl-C to stop)",
            handle.config_path().display()
        );
        tokio::signal::ctrl_c().await?;
        handle.stop_watching();
        info!("Stopped following config changes");
    }

    Ok(())
}
