use crate::tools::{self, Toolbox};
use std::{
    fmt::Display,
    path::{Path, PathBuf},
    process::Command,
};
use tracing::debug;

/// Outcome of packing an iconset into an `.icns` file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerOutcome {
    Built(PathBuf),

    /// Packing was disabled
    Skipped,

    Failed(String),
}

impl ContainerOutcome {
    pub fn failed(&self) -> bool {
        matches!(self, ContainerOutcome::Failed(_))
    }
}

impl Display for ContainerOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerOutcome::Built(path) => write!(f, "created {}", path.display()),
            ContainerOutcome::Skipped => write!(f, "skipped"),
            ContainerOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Build the `iconutil` command line.
pub fn command(tools: &Toolbox, iconset: &Path, icns: &Path) -> Command {
    let mut command = Command::new(&tools.iconutil);
    command
        .arg("-c")
        .arg("icns")
        .arg(iconset)
        .arg("-o")
        .arg(icns);
    command
}

/// Pack the PNGs in `iconset` into a single `.icns` file. Existing PNGs are
/// never touched, whatever the outcome.
pub fn build_icns(tools: &Toolbox, iconset: &Path, icns: &Path) -> ContainerOutcome {
    if let Some(parent) = icns.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                return ContainerOutcome::Failed(format!(
                    "Failed to create {}: {err}",
                    parent.display()
                ));
            }
        }
    }

    match tools::run(command(tools, iconset, icns)) {
        Ok(output) if output.status.success() => {
            if icns.exists() {
                debug!("Packed {} into {}", iconset.display(), icns.display());
                ContainerOutcome::Built(icns.to_path_buf())
            } else {
                ContainerOutcome::Failed(format!(
                    "{} did not produce {}",
                    tools.iconutil.display(),
                    icns.display()
                ))
            }
        }
        Ok(output) => {
            debug!(stderr = %String::from_utf8_lossy(&output.stderr), "iconutil failed");
            ContainerOutcome::Failed(format!(
                "{} exited with {}: {}",
                tools.iconutil.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))
        }
        Err(err) => ContainerOutcome::Failed(format!(
            "Failed to invoke {}: {err}",
            tools.iconutil.display()
        )),
    }
}
