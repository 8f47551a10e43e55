use std::fmt::Display;

/// Logical sizes (in points) of a macOS iconset. Each is rendered at 1x and
/// 2x density.
const MACOS_POINT_SIZES: [u32; 5] = [16, 32, 128, 256, 512];

/// One rasterized output of an icon container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconSize {
    /// Width and height of the bitmap in pixels
    pub pixels: u32,

    /// Name of the output file within the iconset directory
    pub filename: String,
}

impl IconSize {
    /// Create an entry for the given logical size and density, following the
    /// `icon_<P>x<P>[@2x].png` convention.
    pub fn new(points: u32, retina: bool) -> Self {
        if retina {
            Self {
                pixels: points * 2,
                filename: format!("icon_{points}x{points}@2x.png"),
            }
        } else {
            Self {
                pixels: points,
                filename: format!("icon_{points}x{points}.png"),
            }
        }
    }
}

impl Display for IconSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}x{})", self.filename, self.pixels, self.pixels)
    }
}

/// Every bitmap `iconutil` expects in a macOS `.iconset`, in order.
pub fn macos_iconset() -> Vec<IconSize> {
    MACOS_POINT_SIZES
        .iter()
        .flat_map(|&points| [IconSize::new(points, false), IconSize::new(points, true)])
        .collect()
}
