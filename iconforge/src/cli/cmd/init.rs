use crate::config::{Config, ConfigPath};
use anyhow::{Result, bail};
use std::{path::Path, process::ExitCode};
use tracing::{error, info};

/// Write a default config in the given format, unless `dir` already has one.
fn write_default(dir: &Path, format: &ConfigPath) -> Result<ConfigPath> {
    if let Some(existing) = ConfigPath::from_dir(dir) {
        bail!("A config file already exists: {existing}");
    }

    let config_path = format.in_dir(dir);
    config_path.write(&Config::default())?;
    Ok(config_path)
}

pub fn run(dir: &Path, format: ConfigPath) -> ExitCode {
    match write_default(dir, &format) {
        Ok(config_path) => {
            info!("Wrote {config_path}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!("Failed to write config: {error:#}");
            ExitCode::FAILURE
        }
    }
}
