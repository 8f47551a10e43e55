use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{debug, info, trace, warn};

/// Locations of the external programs. Plain names are resolved through
/// `PATH`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Toolbox {
    pub rsvg_convert: PathBuf,
    pub convert: PathBuf,
    pub iconutil: PathBuf,
}

impl Default for Toolbox {
    fn default() -> Self {
        Self {
            rsvg_convert: PathBuf::from("rsvg-convert"),
            convert: PathBuf::from("convert"),
            iconutil: PathBuf::from("iconutil"),
        }
    }
}

/// Supported SVG rasterizers in order of preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
pub enum Rasterizer {
    /// librsvg's command-line renderer
    #[strum(to_string = "rsvg-convert")]
    RsvgConvert,

    /// ImageMagick's `convert`
    #[strum(to_string = "ImageMagick")]
    ImageMagick,
}

impl Rasterizer {
    /// The program that implements this rasterizer.
    pub fn program<'a>(&self, tools: &'a Toolbox) -> &'a Path {
        match self {
            Rasterizer::RsvgConvert => &tools.rsvg_convert,
            Rasterizer::ImageMagick => &tools.convert,
        }
    }

    /// The rasterizer to try when this one fails.
    pub fn fallback(&self) -> Rasterizer {
        match self {
            Rasterizer::RsvgConvert => Rasterizer::ImageMagick,
            Rasterizer::ImageMagick => Rasterizer::RsvgConvert,
        }
    }

    pub fn install_hint(&self) -> &'static str {
        match self {
            Rasterizer::RsvgConvert => "librsvg (recommended): brew install librsvg",
            Rasterizer::ImageMagick => "ImageMagick: brew install imagemagick",
        }
    }

    /// Build the command that renders `src` into a `pixels` x `pixels` PNG at
    /// `dst`.
    pub fn command(&self, tools: &Toolbox, src: &Path, dst: &Path, pixels: u32) -> Command {
        let mut command = Command::new(self.program(tools));
        match self {
            Rasterizer::RsvgConvert => {
                command
                    .arg("-w")
                    .arg(pixels.to_string())
                    .arg("-h")
                    .arg(pixels.to_string())
                    .arg(src)
                    .arg("-o")
                    .arg(dst);
            }
            Rasterizer::ImageMagick => {
                command
                    .arg("-background")
                    .arg("transparent")
                    .arg("-size")
                    .arg(format!("{pixels}x{pixels}"))
                    .arg(src)
                    .arg(dst);
            }
        }
        command
    }
}

/// Run a command to completion with its output captured.
pub fn run(mut command: Command) -> std::io::Result<Output> {
    trace!(command = ?command, "Running external tool");
    command.output()
}

/// Check whether the given program responds to a version query.
pub fn responds(program: &Path) -> bool {
    let mut command = Command::new(program);
    command.arg("--version");

    match run(command) {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let version = stdout.lines().next().unwrap_or_default();
            debug!(version, "Found {}", program.display());
            true
        }
        Ok(output) => {
            debug!(status = %output.status, "{} exited unsuccessfully", program.display());
            false
        }
        Err(error) => {
            debug!(error = %error, "Failed to invoke {}", program.display());
            false
        }
    }
}

/// Check whether the given program can be spawned at all. Some tools (like
/// `iconutil`) have no harmless flag that exits successfully.
pub fn installed(program: &Path) -> bool {
    run(Command::new(program)).is_ok()
}

/// Find the first rasterizer that's available on this machine.
pub fn probe(tools: &Toolbox) -> Option<Rasterizer> {
    for rasterizer in Rasterizer::iter() {
        if responds(rasterizer.program(tools)) {
            info!("{rasterizer} is available");
            return Some(rasterizer);
        }
        warn!("{rasterizer} not found");
    }

    None
}

/// Check every rasterizer, in order of preference.
pub fn availability(tools: &Toolbox) -> Vec<(Rasterizer, bool)> {
    Rasterizer::iter()
        .map(|rasterizer| (rasterizer, responds(rasterizer.program(tools))))
        .collect()
}

/// A user facing explanation of how to get a rasterizer.
pub fn install_hints() -> String {
    let mut hints = String::from("No suitable SVG converter found! Please install one of:");
    for rasterizer in Rasterizer::iter() {
        hints.push_str("\n  - ");
        hints.push_str(rasterizer.install_hint());
    }
    hints
}
