use crate::{
    sizes::IconSize,
    tools::{self, Rasterizer, Toolbox},
};
use anyhow::{Context, Result, bail};
use std::{fs::File, io::BufReader, path::Path};
use tracing::{debug, error, warn};

/// Outcome of rasterizing a single entry of the size matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conversion {
    /// Rendered by the primary rasterizer
    Primary(Rasterizer),

    /// Rendered by the secondary rasterizer after the primary failed
    Fallback(Rasterizer),

    /// Neither rasterizer produced the file
    Failed,
}

impl Conversion {
    pub fn succeeded(&self) -> bool {
        !matches!(self, Conversion::Failed)
    }
}

/// Per entry outcomes of a rasterization pass, in size matrix order.
#[derive(Clone, Debug, Default)]
pub struct RasterizeReport {
    pub results: Vec<(IconSize, Conversion)>,
}

impl RasterizeReport {
    pub fn succeeded(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, conversion)| conversion.succeeded())
            .count()
    }

    /// Entries that could not be produced by either rasterizer.
    pub fn failed(&self) -> Vec<&IconSize> {
        self.results
            .iter()
            .filter(|(_, conversion)| !conversion.succeeded())
            .map(|(size, _)| size)
            .collect()
    }

    pub fn conversion(&self, filename: &str) -> Option<Conversion> {
        self.results
            .iter()
            .find(|(size, _)| size.filename == filename)
            .map(|(_, conversion)| *conversion)
    }
}

/// Read the dimensions from a PNG header.
pub fn png_dimensions(path: impl AsRef<Path>) -> Result<(u32, u32)> {
    let decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    let reader = decoder.read_info()?;
    let info = reader.info();
    Ok((info.width, info.height))
}

/// Renders an SVG into every entry of a size matrix, falling back to the
/// secondary rasterizer when the primary fails.
pub struct RasterizeDriver<'a> {
    pub tools: &'a Toolbox,
    pub primary: Rasterizer,

    /// Whether to check the output PNG's dimensions after each render
    pub verify: bool,
}

impl<'a> RasterizeDriver<'a> {
    pub fn new(tools: &'a Toolbox, primary: Rasterizer) -> Self {
        Self {
            tools,
            primary,
            verify: true,
        }
    }

    /// Make a single attempt at rendering `size` with the given rasterizer.
    fn attempt(
        &self,
        rasterizer: Rasterizer,
        svg: &Path,
        output: &Path,
        size: &IconSize,
    ) -> Result<()> {
        let command = rasterizer.command(self.tools, svg, output, size.pixels);
        let result = tools::run(command).with_context(|| {
            format!(
                "Failed to invoke {}",
                rasterizer.program(self.tools).display()
            )
        })?;

        if !result.status.success() {
            bail!(
                "{rasterizer} exited with {}: {}",
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            );
        }

        if !output.exists() {
            bail!("{rasterizer} did not produce {}", output.display());
        }

        if self.verify {
            let (width, height) = png_dimensions(output)
                .with_context(|| format!("{rasterizer} produced an unreadable PNG"))?;
            if width != size.pixels || height != size.pixels {
                bail!(
                    "{rasterizer} produced a {width}x{height} image instead of {0}x{0}",
                    size.pixels
                );
            }
        }

        Ok(())
    }

    /// Render one entry, trying the secondary rasterizer if the primary fails.
    pub fn rasterize(&self, svg: &Path, dir: &Path, size: &IconSize) -> Conversion {
        let output = dir.join(&size.filename);

        match self.attempt(self.primary, svg, &output, size) {
            Ok(_) => {
                debug!("Created {size}");
                return Conversion::Primary(self.primary);
            }
            Err(err) => {
                debug!(error = %err, "Primary rasterizer failed for {}", size.filename);
                remove_partial(&output);
            }
        }

        let secondary = self.primary.fallback();
        match self.attempt(secondary, svg, &output, size) {
            Ok(_) => {
                warn!("Created {size} with {secondary}");
                Conversion::Fallback(secondary)
            }
            Err(err) => {
                debug!(error = %err, "Secondary rasterizer failed for {}", size.filename);
                remove_partial(&output);
                error!("Failed to create {}", size.filename);
                Conversion::Failed
            }
        }
    }

    /// Render every entry in order. A failed entry never stops the rest.
    pub fn rasterize_all(
        &self,
        svg: &Path,
        dir: &Path,
        sizes: &[IconSize],
        progress: &dyn Fn(u64),
    ) -> RasterizeReport {
        let mut report = RasterizeReport::default();

        for size in sizes {
            let conversion = self.rasterize(svg, dir, size);
            report.results.push((size.clone(), conversion));
            progress(1);
        }

        report
    }
}

fn remove_partial(output: &Path) {
    if output.exists() {
        if let Err(err) = std::fs::remove_file(output) {
            warn!(error = %err, "Failed to remove {}", output.display());
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::{
        asset::ICON_SVG,
        sizes::macos_iconset,
        testing::{Behavior, FakeTools},
    };
    use std::path::PathBuf;

    fn setup() -> Result<(FakeTools, tempfile::TempDir, PathBuf)> {
        let fakes = FakeTools::new()?;
        let out = tempfile::tempdir()?;
        let svg = out.path().join("icon.svg");
        std::fs::write(&svg, ICON_SVG)?;
        Ok((fakes, out, svg))
    }

    #[test_log::test]
    fn test_primary_succeeds() -> Result<()> {
        let (fakes, out, svg) = setup()?;
        let tools = fakes.toolbox(Behavior::Render, Behavior::Fail, true)?;
        let driver = RasterizeDriver::new(&tools, Rasterizer::RsvgConvert);

        let report = driver.rasterize_all(&svg, out.path(), &macos_iconset(), &|_| {});

        assert_eq!(report.succeeded(), 10);
        for (size, conversion) in &report.results {
            assert_eq!(*conversion, Conversion::Primary(Rasterizer::RsvgConvert));
            assert_eq!(
                png_dimensions(out.path().join(&size.filename))?,
                (size.pixels, size.pixels)
            );
        }
        Ok(())
    }

    #[test_log::test]
    fn test_fallback_succeeds() -> Result<()> {
        let (fakes, out, svg) = setup()?;
        let tools = fakes.toolbox(Behavior::FailOn(vec![128]), Behavior::Render, true)?;
        let driver = RasterizeDriver::new(&tools, Rasterizer::RsvgConvert);

        let report = driver.rasterize_all(&svg, out.path(), &macos_iconset(), &|_| {});

        assert_eq!(report.succeeded(), 10);
        assert_eq!(
            report.conversion("icon_128x128.png"),
            Some(Conversion::Fallback(Rasterizer::ImageMagick))
        );
        assert_eq!(
            report.conversion("icon_32x32@2x.png"),
            Some(Conversion::Primary(Rasterizer::RsvgConvert))
        );
        assert_eq!(
            png_dimensions(out.path().join("icon_128x128.png"))?,
            (128, 128)
        );
        Ok(())
    }

    #[test_log::test]
    fn test_both_fail_continues() -> Result<()> {
        let (fakes, out, svg) = setup()?;
        let tools = fakes.toolbox(
            Behavior::FailOn(vec![256]),
            Behavior::FailOn(vec![256]),
            true,
        )?;
        let driver = RasterizeDriver::new(&tools, Rasterizer::RsvgConvert);

        let report = driver.rasterize_all(&svg, out.path(), &macos_iconset(), &|_| {});

        let failed: Vec<&str> = report
            .failed()
            .into_iter()
            .map(|size| size.filename.as_str())
            .collect();
        assert_eq!(failed, vec!["icon_128x128@2x.png", "icon_256x256.png"]);
        assert!(!out.path().join("icon_128x128@2x.png").exists());
        assert!(!out.path().join("icon_256x256.png").exists());

        // Entries after the failures still ran
        assert!(out.path().join("icon_512x512@2x.png").exists());
        assert_eq!(report.succeeded(), 8);
        Ok(())
    }

    #[test_log::test]
    fn test_wrong_dimensions_fall_back() -> Result<()> {
        let (fakes, out, svg) = setup()?;
        let tools = fakes.toolbox(Behavior::Render, Behavior::WrongSize, true)?;
        let driver = RasterizeDriver::new(&tools, Rasterizer::ImageMagick);

        let size = IconSize::new(32, false);
        assert_eq!(
            driver.rasterize(&svg, out.path(), &size),
            Conversion::Fallback(Rasterizer::RsvgConvert)
        );
        Ok(())
    }

    #[test_log::test]
    fn test_wrong_dimensions_unverified() -> Result<()> {
        let (fakes, out, svg) = setup()?;
        let tools = fakes.toolbox(Behavior::Fail, Behavior::WrongSize, true)?;
        let mut driver = RasterizeDriver::new(&tools, Rasterizer::ImageMagick);
        driver.verify = false;

        let size = IconSize::new(32, false);
        assert_eq!(
            driver.rasterize(&svg, out.path(), &size),
            Conversion::Primary(Rasterizer::ImageMagick)
        );
        Ok(())
    }

    #[test_log::test]
    fn test_missing_secondary() -> Result<()> {
        let (fakes, out, svg) = setup()?;
        let tools = fakes.toolbox(Behavior::Fail, Behavior::Missing, true)?;
        let driver = RasterizeDriver::new(&tools, Rasterizer::RsvgConvert);

        let size = IconSize::new(16, false);
        assert_eq!(driver.rasterize(&svg, out.path(), &size), Conversion::Failed);
        assert!(!out.path().join(&size.filename).exists());
        Ok(())
    }

    #[test]
    fn test_progress_ticks() -> Result<()> {
        let (fakes, out, svg) = setup()?;
        let tools = fakes.toolbox(Behavior::Render, Behavior::Render, true)?;
        let driver = RasterizeDriver::new(&tools, Rasterizer::RsvgConvert);

        let ticks = std::cell::Cell::new(0);
        driver.rasterize_all(&svg, out.path(), &macos_iconset(), &|n| {
            ticks.set(ticks.get() + n)
        });
        assert_eq!(ticks.get(), 10);
        Ok(())
    }
}
