use crate::{asset::IconSource, generator::Generator, tools::Toolbox};
use anyhow::{Result, bail};
use clap::{ValueEnum, builder::PossibleValue};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

/// Settings for a generator run. Every field has a default so an empty (or
/// missing) config file is valid.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Use this SVG instead of the built-in icon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<PathBuf>,

    pub iconset_dir: PathBuf,

    /// Whether to pack the iconset into an `.icns` file
    pub icns: bool,

    pub icns_path: PathBuf,

    pub verify_dimensions: bool,

    pub tools: Toolbox,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            svg: None,
            iconset_dir: PathBuf::from("build/icon.iconset"),
            icns: true,
            icns_path: PathBuf::from("build/icon.icns"),
            verify_dimensions: true,
            tools: Toolbox::default(),
        }
    }
}

impl Config {
    /// Load the config file in the given directory, or fall back to defaults
    /// when there isn't one.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        match ConfigPath::from_dir(path) {
            Some(config_path) => config_path.load(),
            None => Ok(Config::default()),
        }
    }
}

impl From<&Config> for Generator {
    fn from(config: &Config) -> Self {
        let mut generator = Generator::new(
            &config.iconset_dir,
            config.icns.then(|| config.icns_path.clone()),
        );
        generator.source = match &config.svg {
            Some(path) => IconSource::File(path.clone()),
            None => IconSource::Builtin,
        };
        generator.tools = config.tools.clone();
        generator.verify_dimensions = config.verify_dimensions;
        generator
    }
}

/// Represents a configuration file. This mainly helps sort out the supported
/// config formats.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigPath {
    Json(PathBuf),
    Toml(PathBuf),
}

impl Default for ConfigPath {
    fn default() -> Self {
        ConfigPath::Toml(PathBuf::from("./iconforge.toml"))
    }
}

impl ValueEnum for ConfigPath {
    fn value_variants<'a>() -> &'a [Self] {
        // Paths are fixed up with `in_dir` once the format is chosen
        static VARIANTS: std::sync::OnceLock<Vec<ConfigPath>> = std::sync::OnceLock::new();
        VARIANTS.get_or_init(|| {
            vec![
                ConfigPath::Toml(PathBuf::from("./iconforge.toml")),
                ConfigPath::Json(PathBuf::from("./iconforge.json")),
            ]
        })
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match *self {
            ConfigPath::Json(_) => Some(PossibleValue::new("json")),
            ConfigPath::Toml(_) => Some(PossibleValue::new("toml")),
        }
    }
}

impl Display for ConfigPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

impl ConfigPath {
    /// Check for a configuration file in the given directory.
    pub fn from_dir(path: impl AsRef<Path>) -> Option<ConfigPath> {
        let path = path.as_ref();

        if path.join("iconforge.toml").exists() {
            return Some(ConfigPath::Toml(path.join("iconforge.toml")));
        }

        if path.join("iconforge.json").exists() {
            return Some(ConfigPath::Json(path.join("iconforge.json")));
        }

        None
    }

    /// Determine the format of an explicitly given config file from its
    /// extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<ConfigPath> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(ConfigPath::Toml(path.to_path_buf())),
            Some("json") => Ok(ConfigPath::Json(path.to_path_buf())),
            _ => bail!("Unknown config format: {}", path.display()),
        }
    }

    /// The same format, located in the given directory.
    pub fn in_dir(&self, dir: impl AsRef<Path>) -> ConfigPath {
        let dir = dir.as_ref();
        match self {
            ConfigPath::Json(_) => ConfigPath::Json(dir.join("iconforge.json")),
            ConfigPath::Toml(_) => ConfigPath::Toml(dir.join("iconforge.toml")),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ConfigPath::Json(path) | ConfigPath::Toml(path) => path,
        }
    }

    /// Read the configuration.
    pub fn load(&self) -> Result<Config> {
        Ok(match &self {
            Self::Json(path) => serde_json::from_slice(&std::fs::read(path)?)?,
            Self::Toml(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
        })
    }

    /// Write a new configuration file.
    pub fn write(&self, config: &Config) -> Result<()> {
        match &self {
            Self::Json(path) => {
                std::fs::write(path, serde_json::to_vec_pretty(config)?)?;
            }
            Self::Toml(path) => {
                std::fs::write(path, toml::to_string_pretty(config)?.into_bytes())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() -> Result<()> {
        assert_eq!(toml::from_str::<Config>("")?, Config::default());
        assert_eq!(serde_json::from_str::<Config>("{}")?, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_config() -> Result<()> {
        let config: Config = toml::from_str(
            r#"
            svg = "art/icon.svg"
            icns = false

            [tools]
            convert = "/opt/imagemagick/bin/magick"
            "#,
        )?;

        assert_eq!(config.svg, Some(PathBuf::from("art/icon.svg")));
        assert!(!config.icns);
        assert_eq!(config.iconset_dir, PathBuf::from("build/icon.iconset"));
        assert_eq!(config.tools.convert, PathBuf::from("/opt/imagemagick/bin/magick"));
        assert_eq!(config.tools.rsvg_convert, PathBuf::from("rsvg-convert"));
        Ok(())
    }

    #[test]
    fn test_write_and_load() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let config = Config {
            svg: Some(PathBuf::from("icon.svg")),
            verify_dimensions: false,
            ..Config::default()
        };

        for format in ConfigPath::value_variants() {
            let config_path = format.in_dir(tmp.path());
            config_path.write(&config)?;
            assert_eq!(config_path.load()?, config);
        }
        Ok(())
    }

    #[test]
    fn test_from_dir() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        assert_eq!(ConfigPath::from_dir(tmp.path()), None);
        assert_eq!(Config::from_dir(tmp.path())?, Config::default());

        std::fs::write(tmp.path().join("iconforge.json"), "{}")?;
        assert_eq!(
            ConfigPath::from_dir(tmp.path()),
            Some(ConfigPath::Json(tmp.path().join("iconforge.json")))
        );

        // TOML takes precedence
        std::fs::write(tmp.path().join("iconforge.toml"), "")?;
        assert_eq!(
            ConfigPath::from_dir(tmp.path()),
            Some(ConfigPath::Toml(tmp.path().join("iconforge.toml")))
        );
        Ok(())
    }

    #[test]
    fn test_from_file() {
        assert!(matches!(
            ConfigPath::from_file("ci/icons.toml"),
            Ok(ConfigPath::Toml(_))
        ));
        assert!(ConfigPath::from_file("icons.yaml").is_err());
    }

    #[test]
    fn test_generator_from_config() {
        let config = Config {
            svg: Some(PathBuf::from("icon.svg")),
            icns: false,
            ..Config::default()
        };

        let generator = Generator::from(&config);
        assert_eq!(generator.source, IconSource::File(PathBuf::from("icon.svg")));
        assert_eq!(generator.icns_path, None);
        assert_eq!(generator.sizes.len(), 10);
    }
}
