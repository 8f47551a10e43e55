//! Stand-ins for the external tools. Each fake is a small shell script that
//! copies a pre-rendered PNG of the requested size into place.

use crate::{sizes::macos_iconset, tools::Toolbox};
use anyhow::Result;
use std::{
    fs::File,
    io::BufWriter,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

/// How a fake rasterizer behaves when asked to render.
#[derive(Clone, Debug)]
pub enum Behavior {
    /// Produce a correctly sized PNG
    Render,
    /// Answer `--version` but fail every render
    Fail,
    /// Fail renders for the given pixel sizes only
    FailOn(Vec<u32>),
    /// Exit successfully but always produce a 16x16 PNG
    WrongSize,
    /// Not installed at all
    Missing,
}

/// Write a deterministic RGBA PNG.
pub fn write_png(path: &Path, pixels: u32) -> Result<()> {
    let mut encoder = png::Encoder::new(BufWriter::new(File::create(path)?), pixels, pixels);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Fast);

    let data: Vec<u8> = (0..pixels * pixels)
        .flat_map(|i| [(i % 251) as u8, (i % 13) as u8, 0x80, 0xff])
        .collect();

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&data)?;
    writer.finish()?;
    Ok(())
}

pub struct FakeTools {
    pub dir: tempfile::TempDir,
}

impl FakeTools {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir(dir.path().join("fixtures"))?;
        std::fs::create_dir(dir.path().join("bin"))?;

        for size in macos_iconset() {
            let fixture = dir.path().join("fixtures").join(format!("{}.png", size.pixels));
            if !fixture.exists() {
                write_png(&fixture, size.pixels)?;
            }
        }

        Ok(Self { dir })
    }

    fn fixtures(&self) -> PathBuf {
        self.dir.path().join("fixtures")
    }

    fn script(&self, name: &str, body: &str) -> Result<PathBuf> {
        let path = self.dir.path().join("bin").join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}"))?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    /// Create a fake rasterizer. `size_expr` and `dst_expr` are shell
    /// expressions that extract the pixel size and destination from the
    /// arguments of the tool being imitated.
    fn rasterizer(
        &self,
        name: &str,
        size_expr: &str,
        dst_expr: &str,
        behavior: Behavior,
    ) -> Result<PathBuf> {
        let fixtures = self.fixtures();
        let fixtures = fixtures.display();
        let render = match behavior {
            Behavior::Missing => return Ok(self.dir.path().join("missing").join(name)),
            Behavior::Render => format!("cp \"{fixtures}/$SIZE.png\" \"$DST\""),
            Behavior::Fail => String::from("echo \"render failed\" >&2\nexit 1"),
            Behavior::FailOn(sizes) => {
                let mut body = String::new();
                for size in sizes {
                    body.push_str(&format!(
                        "if [ \"$SIZE\" = \"{size}\" ]; then echo \"render failed\" >&2; exit 1; fi\n"
                    ));
                }
                body.push_str(&format!("cp \"{fixtures}/$SIZE.png\" \"$DST\""));
                body
            }
            Behavior::WrongSize => format!("cp \"{fixtures}/16.png\" \"$DST\""),
        };

        self.script(
            name,
            &format!(
                "if [ \"$1\" = \"--version\" ]; then echo \"{name} 1.0\"; exit 0; fi\nSIZE={size_expr}\nDST={dst_expr}\n{render}\n"
            ),
        )
    }

    pub fn rsvg_convert(&self, behavior: Behavior) -> Result<PathBuf> {
        // rsvg-convert -w W -h H SRC -o DST
        self.rasterizer("rsvg-convert", "\"$2\"", "\"$7\"", behavior)
    }

    pub fn convert(&self, behavior: Behavior) -> Result<PathBuf> {
        // convert -background transparent -size WxH SRC DST
        self.rasterizer("convert", "\"${4%%x*}\"", "\"$6\"", behavior)
    }

    /// Create a fake `iconutil` that concatenates the iconset into the
    /// output, or fails.
    pub fn iconutil(&self, succeed: bool) -> Result<PathBuf> {
        if succeed {
            // iconutil -c icns DIR -o DST
            self.script("iconutil", "cat \"$3\"/*.png > \"$5\"\n")
        } else {
            self.script("iconutil", "echo \"invalid iconset\" >&2\nexit 1\n")
        }
    }

    pub fn toolbox(&self, rsvg: Behavior, convert: Behavior, iconutil: bool) -> Result<Toolbox> {
        Ok(Toolbox {
            rsvg_convert: self.rsvg_convert(rsvg)?,
            convert: self.convert(convert)?,
            iconutil: self.iconutil(iconutil)?,
        })
    }
}
