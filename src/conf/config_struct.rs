use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

use clap::ValueEnum;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    ConfigFile,
    Deserializer,
    UnsupportedValue(String),
    InvalidOverride(String),
    MissingProperties(Vec<String>),
    InvalidProperty(String),
    NoArchToRelease,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ConfigFile => write!(f, "Cannot read property file"),
            ConfigError::Deserializer => write!(f, "Cannot parse property file"),
            ConfigError::UnsupportedValue(key) => {
                write!(f, "Property {} has a value that is not a scalar", key)
            }
            ConfigError::InvalidOverride(raw) => {
                write!(f, "Override {} does not follow key=value", raw)
            }
            ConfigError::MissingProperties(keys) => {
                write!(f, "Required properties are missing: {}", keys.join(", "))
            }
            ConfigError::InvalidProperty(key) => write!(f, "Property {} has an invalid value", key),
            ConfigError::NoArchToRelease => write!(
                f,
                "No architecture to release, set one of {}",
                Arch::ALL
                    .iter()
                    .map(|arch| arch.property("url"))
                    .collect::<Vec<String>>()
                    .join(", ")
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    Info,
    Debug,
    Warn,
    Error,
    Trace,
}

impl Default for ErrorLevel {
    fn default() -> Self {
        ErrorLevel::Info
    }
}

impl Display for ErrorLevel {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

impl From<&ErrorLevel> for LevelFilter {
    fn from(level: &ErrorLevel) -> Self {
        match level {
            ErrorLevel::Info => LevelFilter::Info,
            ErrorLevel::Debug => LevelFilter::Debug,
            ErrorLevel::Warn => LevelFilter::Warn,
            ErrorLevel::Error => LevelFilter::Error,
            ErrorLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Win32,
    Win64,
    Win3264,
}

impl Arch {
    /// Release order.
    pub const ALL: [Arch; 3] = [Arch::Win32, Arch::Win64, Arch::Win3264];

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Win32 => "win32",
            Arch::Win64 => "win64",
            Arch::Win3264 => "win3264",
        }
    }

    /// Property key of one `atf.<arch>.*` companion, e.g. `atf.win64.url`.
    pub fn property(&self, name: &str) -> String {
        format!("atf.{}.{}", self.as_str(), name)
    }
}

impl Display for Arch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArchParams {
    pub arch: Arch,
    pub url: String,
    pub filename: String,
    pub ext: String,
    /// Path relative to the extraction folder that has to exist, empty to skip.
    pub assert_extract: String,
}

impl ArchParams {
    pub fn archive_name(&self) -> String {
        format!("{}.{}", self.filename, self.ext)
    }

    pub fn is_zip(&self) -> bool {
        self.ext.eq_ignore_ascii_case("zip")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildParams {
    pub app_name: String,
    pub app_type: String,
    pub app_version: String,
    pub build_path: PathBuf,
    pub setup_path: PathBuf,
    pub tmp_path: PathBuf,
    pub release_path: PathBuf,
    pub debug: bool,
    pub archs: Vec<ArchParams>,
}

impl BuildParams {
    pub fn package_name(&self, arch: Arch) -> String {
        format!("{}-{}-{}.zip", self.app_name, self.app_version, arch)
    }
}

/// Written as `portapp.toml` at the root of each bundle.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct PortappManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub app_type: String,
    pub version: String,
    pub arch: Arch,
    pub build_id: String,
}
