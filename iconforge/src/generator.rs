use crate::{
    asset::IconSource,
    container::{self, ContainerOutcome},
    rasterize::{RasterizeDriver, RasterizeReport},
    sizes::{IconSize, macos_iconset},
    tools::{self, Rasterizer, Toolbox},
};
use anyhow::{Context, Result, bail};
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

/// Receives updates as a [`Generator::run`] moves through its phases.
pub trait Progress {
    /// Rasterization of `count` entries is about to start
    fn rasterizing(&self, _count: usize) {}

    /// One entry of the size matrix was processed
    fn rasterized(&self) {}

    /// Packing the container is about to start
    fn packing(&self) {}

    /// Packing the container finished
    fn packed(&self) {}
}

impl Progress for () {}

/// Produces an iconset and `.icns` file from a vector icon by driving the
/// external tools.
#[derive(Clone, Debug)]
pub struct Generator {
    pub source: IconSource,

    /// Bitmaps to produce, in order
    pub sizes: Vec<IconSize>,

    /// Directory that receives the PNGs
    pub iconset_dir: PathBuf,

    /// Destination of the packed container, or `None` to skip packing
    pub icns_path: Option<PathBuf>,

    pub tools: Toolbox,

    pub verify_dimensions: bool,

    /// Where to put the temporary SVG file (defaults to the system temp dir)
    pub temp_dir: Option<PathBuf>,
}

impl Generator {
    pub fn new(iconset_dir: impl AsRef<Path>, icns_path: Option<PathBuf>) -> Self {
        Self {
            source: IconSource::Builtin,
            sizes: macos_iconset(),
            iconset_dir: iconset_dir.as_ref().to_path_buf(),
            icns_path,
            tools: Toolbox::default(),
            verify_dimensions: true,
            temp_dir: None,
        }
    }

    /// Create the iconset directory and remove any files left from an earlier
    /// run.
    fn prepare_output(&self) -> Result<()> {
        std::fs::create_dir_all(&self.iconset_dir)
            .with_context(|| format!("Failed to create {}", self.iconset_dir.display()))?;

        for entry in std::fs::read_dir(&self.iconset_dir)? {
            let path = entry?.path();
            if path.is_file() {
                debug!("Removing stale {}", path.display());
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Write the SVG text to a temporary file that's deleted on drop.
    fn materialize(&self, svg: &str) -> Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("iconforge-").suffix(".svg");

        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .context("Failed to create temporary SVG file")?;

        file.write_all(svg.as_bytes())?;
        file.flush()?;
        debug!("Wrote SVG to {}", file.path().display());
        Ok(file)
    }

    /// Run the whole pipeline: probe, rasterize every size, pack the
    /// container and clean up.
    ///
    /// An `Err` means nothing was attempted (or setup failed). Failures of
    /// individual sizes and of the packer are reported in the summary instead.
    pub fn run(&self, progress: &dyn Progress) -> Result<RunSummary> {
        let svg = self.source.load()?;

        let Some(primary) = tools::probe(&self.tools) else {
            bail!("{}", tools::install_hints());
        };

        self.prepare_output()?;

        let source = self.materialize(&svg)?;
        let source_path = source.path().to_path_buf();

        let mut driver = RasterizeDriver::new(&self.tools, primary);
        driver.verify = self.verify_dimensions;

        info!(
            rasterizer = %primary,
            count = self.sizes.len(),
            "Rasterizing into {}",
            self.iconset_dir.display()
        );
        progress.rasterizing(self.sizes.len());
        let report = driver.rasterize_all(
            source.path(),
            &self.iconset_dir,
            &self.sizes,
            &|_| progress.rasterized(),
        );

        let container = match &self.icns_path {
            Some(icns) => {
                progress.packing();
                let outcome = container::build_icns(&self.tools, &self.iconset_dir, icns);
                progress.packed();

                if let ContainerOutcome::Failed(reason) = &outcome {
                    error!("Failed to create .icns file: {reason}");
                } else {
                    info!(".icns file {outcome}");
                }
                outcome
            }
            None => ContainerOutcome::Skipped,
        };

        if let Err(err) = source.close() {
            warn!(error = %err, "Failed to remove {}", source_path.display());
        }

        Ok(RunSummary {
            rasterizer: primary,
            report,
            container,
            source_path,
        })
    }
}

/// Everything that happened during a [`Generator::run`].
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// The primary rasterizer selected by the probe
    pub rasterizer: Rasterizer,
    pub report: RasterizeReport,
    pub container: ContainerOutcome,

    /// The temporary SVG file that was fed to the rasterizers
    pub source_path: PathBuf,
}

impl RunSummary {
    pub fn succeeded(&self) -> bool {
        !self.container.failed()
    }
}
