//! Settings command implementation

use anyhow::Result;
use colored::Colorize;
use rotalog::resolve_settings;

use crate::cli::ConfigArgs;

pub fn execute(args: &ConfigArgs) -> Result<()> {
    let loader = args.loader()?;
    let path = loader.path().to_path_buf();

    let settings = resolve_settings(&loader, &args.prefix)?;

    println!("{} {}", "#".dimmed(), path.display().to_string().dimmed());
    println!("{} {}", "#".dimmed(), format!("section: {}", args.prefix).dimmed());
    print!("{}", serde_yaml::to_string(&settings)?);
    Ok(())
}
