use crate::config::{Config, ConfigPath};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod check;
pub mod export;
pub mod generate;
pub mod init;
pub mod sizes;

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate the iconset and .icns file (the default)
    Generate(GenerateArgs),

    /// Check which external tools are available
    Check {},

    /// List the bitmaps that make up the iconset
    Sizes {},

    /// Write the icon's SVG source to a file
    ExportSvg {
        /// Destination of the SVG file
        #[clap(index = 1)]
        path: PathBuf,
    },

    /// Write a default config file to the current directory
    Init {
        /// Config file format
        #[clap(long, value_enum, default_value = "toml")]
        format: ConfigPath,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Render this SVG instead of the built-in icon
    #[clap(long)]
    pub svg: Option<PathBuf>,

    /// Directory that receives the PNG files
    #[clap(long)]
    pub iconset_dir: Option<PathBuf>,

    /// Destination of the .icns file
    #[clap(long)]
    pub icns: Option<PathBuf>,

    /// Only produce the PNG files
    #[clap(long, num_args = 0)]
    pub no_icns: bool,

    /// Don't check the dimensions of produced images
    #[clap(long, num_args = 0)]
    pub no_verify: bool,
}

/// Load the config from the given file, or discover one in `dir`.
pub fn load_config(dir: &Path, path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => ConfigPath::from_file(path)?.load()?,
        None => Config::from_dir(dir)?,
    };
    debug!("Loaded: {:#?}", &config);
    Ok(config)
}
