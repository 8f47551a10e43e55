use crate::{asset::IconSource, cli::cmd::load_config};
use anyhow::Result;
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{error, info};

/// Write the configured icon source to `path`.
fn export(dir: &Path, path: &Path, config: Option<&Path>) -> Result<IconSource> {
    let config = load_config(dir, config)?;

    let source = match config.svg {
        Some(svg) => IconSource::File(svg),
        None => IconSource::Builtin,
    };
    source.export(path)?;
    Ok(source)
}

pub fn run(dir: &Path, path: PathBuf, config: Option<&Path>) -> ExitCode {
    match export(dir, &path, config) {
        Ok(source) => {
            info!("Wrote {source} icon to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
